//! Finds up to `k` distinct journeys by repeatedly re-scanning with a
//! tightened deadline.

use crate::error::Error;
use crate::model::{StopId, Time, TimetableStore};

use super::extract::{extract_journey, Journey};
use super::scan::reverse_connection_scan;

/// Runs the reverse scan up to `k` times, each time tightening the deadline
/// to just before the previous result's arrival, so every returned journey
/// arrives strictly earlier than the one before it.
///
/// `keep_going` is polled before each scan and lets a caller abort a long
/// enumeration early; the journeys found so far are returned rather than an
/// error, since a partial result is still useful.
///
/// # Errors
///
/// Propagates [`Error::UnknownStop`] from the underlying scan.
pub(crate) fn enumerate_journeys(
    store: &TimetableStore,
    origin: StopId,
    destination: StopId,
    deadline: Time,
    k: usize,
    keep_going: &dyn Fn() -> bool,
) -> Result<Vec<Journey>, Error> {
    store.validate_stop(origin)?;
    store.validate_stop(destination)?;

    let mut journeys = Vec::with_capacity(k.min(16));
    let mut current_deadline = deadline;

    while journeys.len() < k && keep_going() {
        let scan = reverse_connection_scan(store, origin, destination, current_deadline)?;
        let Some(journey) = extract_journey(&scan.s, origin, destination) else {
            break;
        };

        let arrive_time = journey.arrive_time;
        let is_degenerate = journey.legs.is_empty();
        journeys.push(journey);

        if is_degenerate {
            // origin == destination: every re-scan re-seeds the same
            // trivial, legs-empty journey, so there is exactly one distinct
            // journey to report.
            break;
        }

        let Some(next_deadline) = arrive_time.checked_sub(1) else {
            break;
        };
        current_deadline = next_deadline;
    }

    Ok(journeys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, Stop, TimetableStore};

    fn stop(id: StopId) -> Stop {
        Stop {
            id,
            external_id: id.to_string(),
            name: None,
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn origin_equals_destination_yields_exactly_one_journey_regardless_of_k() {
        let stops = vec![stop(0), stop(1)];
        let connections = vec![Connection {
            connection_id: 0,
            trip_id: 0,
            dep_stop: 0,
            arr_stop: 1,
            dep_time: 100,
            arr_time: 200,
        }];
        let store = TimetableStore::build(stops, connections, Vec::new()).unwrap();

        let journeys = enumerate_journeys(&store, 0, 0, 500, 5, &|| true).unwrap();

        assert_eq!(journeys.len(), 1);
        assert!(journeys[0].legs.is_empty());
    }
}
