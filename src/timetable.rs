use crate::loader::{self, ParseWarning};
use crate::session::{InstructorId, SessionRequest};
use crate::time::{Interval, Time};
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

pub const MORNING: (Time, Time) = (Time(9 * 60), Time(12 * 60));
pub const AFTERNOON: (Time, Time) = (Time(13 * 60), Time(17 * 60));
pub const MEETING_START: Time = Time(17 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        };
        write!(f, "{}", name)
    }
}

/// One line of the weekly agenda, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Entry {
    DayHeader(Weekday),
    Session {
        start: Time,
        subject: Arc<str>,
        instructor: InstructorId,
        duration_min: u64,
    },
    StaffMeeting,
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::DayHeader(day) => write!(f, "{}", day),
            Entry::Session {
                start,
                subject,
                instructor,
                duration_min,
            } => write!(f, "{} {} - Prof. {} {} min", start, subject, instructor, duration_min),
            Entry::StaffMeeting => write!(f, "{} Staff meeting (mandatory)", MEETING_START),
        }
    }
}

/// What became of one request after a build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Placement {
    /// Never consumed: either behind a request that overflows every shift,
    /// or the week ran out first.
    Waiting,
    Placed {
        day: Weekday,
        start: Time,
    },
    /// Dropped because the instructor already had an overlapping booking.
    /// Skipped requests are never retried.
    Skipped,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Waiting => write!(f, "waiting"),
            Placement::Placed { day, start } => write!(f, "{} {}", day, start),
            Placement::Skipped => write!(f, "skipped (instructor busy)"),
        }
    }
}

/// Per-instructor committed intervals, accumulated over the whole week.
/// Intervals carry no day component, so a Monday 09:00 booking blocks that
/// instructor at 09:00 on every day of the run.
#[derive(Debug, Default)]
pub struct Bookings(HashMap<InstructorId, Vec<Interval>>);

impl Bookings {
    pub fn conflicts(&self, instructor: &str, slot: &Interval) -> bool {
        self.0
            .get(instructor)
            .map_or(false, |booked| booked.iter().any(|b| b.conflicts_with(slot)))
    }

    pub fn book(&mut self, instructor: InstructorId, slot: Interval) {
        self.0.entry(instructor).or_default().push(slot);
    }

    /// Booked intervals per instructor, name-sorted for stable display.
    pub fn by_instructor(&self) -> Vec<(&InstructorId, &[Interval])> {
        let mut rows: Vec<_> = self.0.iter().map(|(id, v)| (id, v.as_slice())).collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct Timetable {
    pub requests: Vec<SessionRequest>,
    pub entries: Vec<Entry>,
    pub placements: Vec<Placement>,
    pub bookings: Bookings,
}

impl Timetable {
    pub fn new(requests: Vec<SessionRequest>) -> Timetable {
        let placements = vec![Placement::Waiting; requests.len()];
        Timetable {
            requests,
            entries: Vec::new(),
            placements,
            bookings: Bookings::default(),
        }
    }

    pub fn load_from_file(path: &str) -> io::Result<(Timetable, Vec<ParseWarning>)> {
        let (requests, warnings) = loader::load_from_file(path)?;
        Ok((Timetable::new(requests), warnings))
    }

    /// Builds the weekly agenda: Monday through Friday, morning and afternoon
    /// shift per day, staff meeting at the end of every processed day. Stops
    /// after the day on which the last request was consumed. An empty request
    /// list produces no entries at all.
    pub fn build(&mut self) {
        self.entries.clear();
        self.bookings = Bookings::default();
        self.placements = vec![Placement::Waiting; self.requests.len()];

        if self.requests.is_empty() {
            return;
        }

        let mut cursor = 0;
        for day in Weekday::WEEK {
            self.entries.push(Entry::DayHeader(day));
            cursor = Self::allocate_shift(
                &self.requests,
                day,
                cursor,
                MORNING,
                &mut self.bookings,
                &mut self.placements,
                &mut self.entries,
            );
            cursor = Self::allocate_shift(
                &self.requests,
                day,
                cursor,
                AFTERNOON,
                &mut self.bookings,
                &mut self.placements,
                &mut self.entries,
            );
            self.entries.push(Entry::StaffMeeting);

            if cursor >= self.requests.len() {
                break;
            }
        }

        self.assert_invariants();
    }

    /// Fills one shift greedily, in request order, no backtracking. A request
    /// that overflows the remaining shift stays unconsumed for the next shift;
    /// a request whose instructor is already booked over the tentative slot is
    /// dropped and never retried. Returns the cursor past the consumed prefix.
    fn allocate_shift(
        requests: &[SessionRequest],
        day: Weekday,
        mut cursor: usize,
        shift: (Time, Time),
        bookings: &mut Bookings,
        placements: &mut [Placement],
        entries: &mut Vec<Entry>,
    ) -> usize {
        let (shift_start, shift_end) = shift;
        let mut clock = shift_start;

        while let Some(request) = requests.get(cursor) {
            let slot = Interval::new(clock, clock + request.duration_min);
            if slot.end > shift_end {
                break;
            }

            if bookings.conflicts(&request.instructor, &slot) {
                placements[cursor] = Placement::Skipped;
                cursor += 1;
                continue;
            }

            entries.push(Entry::Session {
                start: clock,
                subject: request.subject.clone(),
                instructor: request.instructor.clone(),
                duration_min: request.duration_min,
            });
            bookings.book(request.instructor.clone(), slot);
            placements[cursor] = Placement::Placed { day, start: clock };
            clock += request.duration_min;
            cursor += 1;
        }

        cursor
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.bookings.by_instructor().iter().all(|(_, booked)| {
                booked.iter().enumerate().all(|(i, a)| {
                    booked[i + 1..].iter().all(|b| !a.conflicts_with(b))
                })
            }),
            "Per-instructor non-overlap invariant violated"
        );

        debug_assert!(
            self.entries.iter().all(|e| match e {
                Entry::Session {
                    start, duration_min, ..
                } => {
                    let end = *start + *duration_min;
                    (*start >= MORNING.0 && end <= MORNING.1)
                        || (*start >= AFTERNOON.0 && end <= AFTERNOON.1)
                }
                _ => true,
            }),
            "Shift containment invariant violated"
        );

        let placed = self
            .placements
            .iter()
            .filter(|p| matches!(p, Placement::Placed { .. }))
            .count();
        let sessions = self
            .entries
            .iter()
            .filter(|e| matches!(e, Entry::Session { .. }))
            .count();
        debug_assert_eq!(placed, sessions, "Placement <-> entry count invariant violated");
    }
}

#[cfg(test)]
mod tests;
