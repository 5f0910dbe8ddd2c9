use serde::Serialize;
use std::sync::Arc;

pub type InstructorId = Arc<str>;

/// One unit of work to schedule. Produced by the loader, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRequest {
    pub subject: Arc<str>,
    pub instructor: InstructorId,
    pub duration_min: u64,
}
