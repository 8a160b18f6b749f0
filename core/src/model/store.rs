//! Immutable, indexed view of a timetable: connections, footpaths, stops.

use hashbrown::HashMap;

use super::types::{Connection, Footpath, Stop, StopId, Time, TripId};
use crate::error::Error;

/// Immutable timetable view. Built once per process (or per timetable
/// reload) and shared read-only across concurrent queries; see the
/// crate-level concurrency notes.
#[derive(Debug, Clone)]
pub struct TimetableStore {
    /// All connections, sorted ascending by `arr_time`, ties broken by
    /// `connection_id`.
    connections: Vec<Connection>,
    /// Footpaths leaving each stop (`stop_a == stop`), sorted by `stop_b`
    /// for deterministic iteration.
    outgoing_footpaths: HashMap<StopId, Vec<Footpath>>,
    /// Footpaths arriving at each stop (`stop_b == stop`), sorted by
    /// `stop_a`. Used internally by the reverse scan, which only ever
    /// needs "who can walk into this stop", never "where can this stop
    /// walk to".
    incoming_footpaths: HashMap<StopId, Vec<Footpath>>,
    stops: Vec<Stop>,
    trip_count: usize,
}

impl TimetableStore {
    /// Builds a store from raw rows, validating the invariants from the
    /// data model before anything touches the routing engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimetableInconsistency`] if a connection has
    /// `dep_time > arr_time`, or if a connection/footpath references a
    /// stop id outside `0..stops.len()`.
    pub fn build(
        stops: Vec<Stop>,
        mut connections: Vec<Connection>,
        footpaths: Vec<Footpath>,
    ) -> Result<TimetableStore, Error> {
        let num_stops = stops.len();
        let mut trip_count = 0;

        for c in &connections {
            if c.dep_time > c.arr_time {
                return Err(Error::TimetableInconsistency(format!(
                    "connection {} departs ({}) after it arrives ({})",
                    c.connection_id, c.dep_time, c.arr_time
                )));
            }
            if c.dep_stop >= num_stops || c.arr_stop >= num_stops {
                return Err(Error::TimetableInconsistency(format!(
                    "connection {} references an unknown stop",
                    c.connection_id
                )));
            }
            trip_count = trip_count.max(c.trip_id + 1);
        }
        for fp in &footpaths {
            if fp.stop_a >= num_stops || fp.stop_b >= num_stops {
                return Err(Error::TimetableInconsistency(
                    "footpath references an unknown stop".to_string(),
                ));
            }
        }

        connections.sort_unstable_by_key(|c| (c.arr_time, c.connection_id));

        let mut outgoing_footpaths: HashMap<StopId, Vec<Footpath>> = HashMap::new();
        let mut incoming_footpaths: HashMap<StopId, Vec<Footpath>> = HashMap::new();
        for fp in footpaths {
            outgoing_footpaths.entry(fp.stop_a).or_default().push(fp);
            incoming_footpaths.entry(fp.stop_b).or_default().push(fp);
        }
        for list in outgoing_footpaths.values_mut() {
            list.sort_unstable_by_key(|fp| fp.stop_b);
        }
        for list in incoming_footpaths.values_mut() {
            list.sort_unstable_by_key(|fp| fp.stop_a);
        }

        Ok(TimetableStore {
            connections,
            outgoing_footpaths,
            incoming_footpaths,
            stops,
            trip_count,
        })
    }

    /// All connections, sorted ascending by arrival time (ties broken by
    /// `connection_id`).
    #[must_use]
    pub fn connections_by_arrival(&self) -> &[Connection] {
        &self.connections
    }

    /// Footpaths leaving `stop` (the `stop_a -> stop_b` direction),
    /// ordered by `stop_b`.
    #[must_use]
    pub fn footpaths_from(&self, stop: StopId) -> &[Footpath] {
        self.outgoing_footpaths
            .get(&stop)
            .map_or(&[], Vec::as_slice)
    }

    /// Footpaths arriving at `stop` (rows where `stop_b == stop`), ordered
    /// by `stop_a`. Crate-internal: only the reverse scan needs this.
    pub(crate) fn footpaths_to(&self, stop: StopId) -> &[Footpath] {
        self.incoming_footpaths
            .get(&stop)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of distinct trip ids seen at load time. Trip ids are
    /// contiguous, so `0..trip_count()` enumerates every trip.
    #[must_use]
    pub fn trip_count(&self) -> usize {
        self.trip_count
    }

    /// The set of distinct trip ids, as the contiguous range they were
    /// interned into at load time.
    #[must_use]
    pub fn trips(&self) -> std::ops::Range<TripId> {
        0..self.trip_count
    }

    #[must_use]
    pub fn stop(&self, stop: StopId) -> Option<&Stop> {
        self.stops.get(stop)
    }

    pub(crate) fn validate_stop(&self, stop: StopId) -> Result<(), Error> {
        if stop < self.stops.len() {
            Ok(())
        } else {
            Err(Error::UnknownStop(stop))
        }
    }

    /// Last connection (in arrival order) whose `arr_time <= deadline`,
    /// i.e. `c0` from the reverse scan's contract.
    pub(crate) fn last_connection_index_by(&self, deadline: Time) -> Option<usize> {
        // `connections` is sorted by arr_time; partition_point finds the
        // first index where arr_time > deadline, so the one before it
        // (if any) is c0.
        let idx = self
            .connections
            .partition_point(|c| c.arr_time <= deadline);
        idx.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn rejects_connection_departing_after_it_arrives() {
        let stops = vec![stop(0), stop(1)];
        let connections = vec![Connection {
            connection_id: 0,
            trip_id: 0,
            dep_stop: 0,
            arr_stop: 1,
            dep_time: 200,
            arr_time: 100,
        }];
        let err = TimetableStore::build(stops, connections, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::TimetableInconsistency(_)));
    }

    #[test]
    fn rejects_out_of_range_stop() {
        let stops = vec![stop(0)];
        let connections = vec![Connection {
            connection_id: 0,
            trip_id: 0,
            dep_stop: 0,
            arr_stop: 5,
            dep_time: 0,
            arr_time: 10,
        }];
        let err = TimetableStore::build(stops, connections, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::TimetableInconsistency(_)));
    }

    #[test]
    fn footpaths_are_indexed_by_both_directions() {
        let stops = vec![stop(0), stop(1)];
        let footpaths = vec![Footpath {
            stop_a: 0,
            stop_b: 1,
            duration: 60,
        }];
        let store = TimetableStore::build(stops, Vec::new(), footpaths).unwrap();

        assert_eq!(store.footpaths_from(0).len(), 1);
        assert_eq!(store.footpaths_from(1).len(), 0);
        assert_eq!(store.footpaths_to(1).len(), 1);
        assert_eq!(store.footpaths_to(0).len(), 0);
    }

    #[test]
    fn connections_sorted_by_arrival_time() {
        let stops = vec![stop(0), stop(1)];
        let connections = vec![
            Connection {
                connection_id: 0,
                trip_id: 0,
                dep_stop: 0,
                arr_stop: 1,
                dep_time: 300,
                arr_time: 400,
            },
            Connection {
                connection_id: 1,
                trip_id: 1,
                dep_stop: 0,
                arr_stop: 1,
                dep_time: 100,
                arr_time: 200,
            },
        ];
        let store = TimetableStore::build(stops, connections, Vec::new()).unwrap();
        let arrivals: Vec<_> = store
            .connections_by_arrival()
            .iter()
            .map(|c| c.arr_time)
            .collect();
        assert_eq!(arrivals, vec![200, 400]);
    }
}
