use crate::session::SessionRequest;
use crate::time::{Interval, Time};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn add_request(
    requests: &mut Vec<SessionRequest>,
    subject: &str,
    instructor: &str,
    duration_min: u64,
) {
    requests.push(SessionRequest {
        subject: id(subject),
        instructor: id(instructor),
        duration_min,
    });
}

pub fn interval(start: u64, end: u64) -> Interval {
    Interval::new(Time(start), Time(end))
}

pub fn arb_id(prefix: &'static str) -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from(format!("{}_1", prefix))),
        Just(Arc::from(format!("{}_2", prefix))),
        Just(Arc::from(format!("{}_3", prefix))),
    ]
}

pub fn arb_request() -> impl Strategy<Value = SessionRequest> {
    (arb_id("SUBJ"), arb_id("PROF"), 10..120u64).prop_map(|(subject, instructor, duration_min)| {
        SessionRequest {
            subject,
            instructor,
            duration_min,
        }
    })
}
