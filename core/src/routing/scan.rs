//! Reverse-time Connection Scan: one backward pass over the arrival-sorted
//! timetable that computes, for every stop, the latest feasible departure
//! that still reaches the destination by the deadline.

use fixedbitset::FixedBitSet;

use crate::error::Error;
use crate::model::{StopId, StopState, Time, TimetableStore, Transport};

/// Output of [`reverse_connection_scan`]: `s[stop]` is the latest feasible
/// departure from `stop`, `t[trip]` is whether any connection of `trip` is
/// used by a feasible path.
#[derive(Debug)]
pub(crate) struct ScanResult {
    pub s: Vec<StopState>,
    pub t: FixedBitSet,
}

/// Runs the reverse connection scan described in the data model's
/// `StopState`/`TripReached` lifecycle.
///
/// # Errors
///
/// Returns [`Error::UnknownStop`] if `origin` or `destination` is outside
/// the store's stop universe.
pub(crate) fn reverse_connection_scan(
    store: &TimetableStore,
    origin: StopId,
    destination: StopId,
    deadline: Time,
) -> Result<ScanResult, Error> {
    store.validate_stop(origin)?;
    store.validate_stop(destination)?;

    let num_stops = store.stops().len();
    let mut s = vec![StopState::EMPTY; num_stops];
    let mut t = FixedBitSet::with_capacity(store.trip_count());

    s[destination] = StopState {
        transport: None,
        start_time: deadline,
        start_stop: Some(destination),
        arrival_time: None,
        arrival_stop: None,
    };

    if origin == destination {
        s[origin] = StopState {
            transport: None,
            start_time: deadline,
            start_stop: Some(origin),
            arrival_time: Some(deadline),
            arrival_stop: Some(destination),
        };
        return Ok(ScanResult { s, t });
    }

    // Seed every stop that can walk directly into the destination. A
    // footpath whose duration exceeds the deadline can never produce a
    // non-negative departure time and is skipped rather than clamped.
    for fp in store.footpaths_to(destination) {
        if let Some(start_time) = deadline.checked_sub(fp.duration) {
            let fp_from = fp.stop_a;
            if s[fp_from].start_time < start_time {
                s[fp_from] = StopState {
                    transport: Some(Transport::Walking),
                    start_time,
                    start_stop: Some(fp_from),
                    arrival_time: Some(deadline),
                    arrival_stop: Some(destination),
                };
            }
        }
    }

    let Some(c0) = store.last_connection_index_by(deadline) else {
        return Ok(ScanResult { s, t });
    };

    let connections = store.connections_by_arrival();
    for c in connections[..=c0].iter().rev() {
        // No earlier connection can improve on the origin's current latest
        // departure, so the scan is done.
        if s[origin].start_time >= c.arr_time {
            break;
        }

        let arrival_side_reachable = t.contains(c.trip_id) || s[c.arr_stop].start_time >= c.arr_time;
        let departure_improves = s[c.dep_stop].start_time < c.dep_time;

        if arrival_side_reachable && departure_improves {
            t.insert(c.trip_id);
            s[c.dep_stop] = StopState {
                transport: Some(Transport::Trip(c.trip_id)),
                start_time: c.dep_time,
                start_stop: Some(c.dep_stop),
                arrival_time: Some(c.arr_time),
                arrival_stop: Some(c.arr_stop),
            };

            for fp in store.footpaths_to(c.dep_stop) {
                let Some(candidate) = c.dep_time.checked_sub(fp.duration) else {
                    continue;
                };
                let fp_from = fp.stop_a;
                if s[fp_from].start_time < candidate {
                    s[fp_from] = StopState {
                        transport: Some(Transport::Walking),
                        start_time: candidate,
                        start_stop: Some(fp_from),
                        arrival_time: Some(c.dep_time),
                        arrival_stop: Some(c.dep_stop),
                    };
                }
            }
        }
    }

    Ok(ScanResult { s, t })
}
