//! Core data types shared by the timetable store and the routing engine

use serde::Serialize;

/// Seconds since midnight. May exceed `86_400` transiently while computing
/// deadlines that cross midnight; callers normalize at the boundary.
pub type Time = u32;

/// Contiguous index into [`crate::model::store::TimetableStore::stops`],
/// assigned at load time.
pub type StopId = usize;

/// Contiguous index identifying a vehicle run, assigned at load time.
pub type TripId = usize;

/// Position of a connection within the arrival-sorted timetable; used only
/// to break ties between connections sharing an `arr_time`.
pub type ConnectionId = usize;

/// One atomic depart-to-arrive segment of a vehicle between two adjacent
/// stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub connection_id: ConnectionId,
    pub trip_id: TripId,
    pub dep_stop: StopId,
    pub arr_stop: StopId,
    pub dep_time: Time,
    pub arr_time: Time,
}

/// A directed walking edge. The core only ever reasons about the
/// `stop_a -> stop_b` direction; reverse walks must be stored as their own
/// row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footpath {
    pub stop_a: StopId,
    pub stop_b: StopId,
    pub duration: Time,
}

/// A transit stop. Coordinates and the display name are opaque passthrough
/// data for external renderers; the routing engine never reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub external_id: String,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// What carries a traveller from one stop to the next: either a scheduled
/// vehicle trip, or an unscheduled walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "trip_id", rename_all = "snake_case")]
pub enum Transport {
    Walking,
    Trip(TripId),
}

/// Per-stop entry of the reverse-scan state `S`: the latest known way to
/// leave a stop and still reach the destination by the deadline.
///
/// `transport = None` means "no known way onward" (the initial value for
/// every stop, and the terminal sentinel once a walk reaches this record
/// from a destination-adjacent stop). `start_stop`/`arrival_stop` are kept
/// as `Option` rather than defaulted to a stop id so the initial/sentinel
/// case can't be mistaken for a real relaxation.
///
/// `Copy` by design: the original Python re-seeds every stop from one
/// shared dict literal and then mutates individual entries in place, which
/// aliases all of them until the first write. A `Copy` struct makes that
/// class of bug structurally impossible here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopState {
    pub transport: Option<Transport>,
    pub start_time: Time,
    pub start_stop: Option<StopId>,
    pub arrival_time: Option<Time>,
    pub arrival_stop: Option<StopId>,
}

impl StopState {
    pub const EMPTY: StopState = StopState {
        transport: None,
        start_time: 0,
        start_stop: None,
        arrival_time: None,
        arrival_stop: None,
    };
}

/// Forward distance from `b` to `a` on a 24-hour wall clock: `a - b`,
/// wrapping through midnight when `a < b`.
#[must_use]
pub fn mod_diff(a: Time, b: Time) -> i64 {
    let (a, b) = (i64::from(a), i64::from(b));
    if a >= b { a - b } else { a - b + 86_400 }
}
