//! Data model for the transit timetable and the reverse-scan working state

pub mod store;
pub mod types;

pub use store::TimetableStore;
pub use types::{
    mod_diff, Connection, ConnectionId, Footpath, Stop, StopId, StopState, Time, Transport,
    TripId,
};
