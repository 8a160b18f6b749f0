//! Journey search: reverse scan, journey extraction, and k-alternatives
//! enumeration over the timetable.

mod enumerate;
mod extract;
mod scan;

pub(crate) use enumerate::enumerate_journeys;
pub use extract::{Journey, Leg};
