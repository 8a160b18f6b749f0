//! Turns the reverse scan's per-stop state into a walkable itinerary.

use serde::Serialize;

use crate::model::{StopId, StopState, Time, Transport};

/// One uninterrupted ride or walk, already collapsed across consecutive
/// connections that share a `trip_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub transport: Transport,
    pub board_stop: StopId,
    pub depart_time: Time,
    pub alight_stop: StopId,
    pub arrive_time: Time,
}

/// A complete origin-to-destination itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journey {
    pub origin: StopId,
    pub destination: StopId,
    pub depart_time: Time,
    pub arrive_time: Time,
    pub legs: Vec<Leg>,
}

/// Walks the scan state forward from `origin`, collapsing runs of
/// connections that belong to the same trip into a single [`Leg`].
///
/// Returns `None` if `origin` has no feasible path to `destination` in `s`.
pub(crate) fn extract_journey(
    s: &[StopState],
    origin: StopId,
    destination: StopId,
) -> Option<Journey> {
    if origin == destination {
        let deadline = s[origin].start_time;
        return Some(Journey {
            origin,
            destination,
            depart_time: deadline,
            arrive_time: deadline,
            legs: Vec::new(),
        });
    }

    if s[origin].transport.is_none() {
        return None;
    }

    let depart_time = s[origin].start_time;
    let mut legs: Vec<Leg> = Vec::new();
    let mut current = origin;

    while let Some(transport) = s[current].transport {
        let state = s[current];
        let arrive_time = state.arrival_time.expect("transport implies an arrival time");
        let arrival_stop = state.arrival_stop.expect("transport implies an arrival stop");

        let merged = match (legs.last_mut(), transport) {
            (Some(last), Transport::Trip(tid)) if last.transport == Transport::Trip(tid) => {
                last.alight_stop = arrival_stop;
                last.arrive_time = arrive_time;
                true
            }
            _ => false,
        };

        if !merged {
            legs.push(Leg {
                transport,
                board_stop: current,
                depart_time: state.start_time,
                alight_stop: arrival_stop,
                arrive_time,
            });
        }

        current = arrival_stop;
    }

    if current != destination {
        return None;
    }

    let arrive_time = legs.last().map_or(depart_time, |leg| leg.arrive_time);

    Some(Journey {
        origin,
        destination,
        depart_time,
        arrive_time,
        legs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(len: usize) -> Vec<StopState> {
        vec![StopState::EMPTY; len]
    }

    #[test]
    fn collapses_consecutive_connections_on_the_same_trip_into_one_leg() {
        let mut s = empty(4);
        // A -trip0-> B -trip0-> C -walk-> D, same chain the scan would build
        s[0] = StopState {
            transport: Some(Transport::Trip(0)),
            start_time: 100,
            start_stop: Some(0),
            arrival_time: Some(200),
            arrival_stop: Some(1),
        };
        s[1] = StopState {
            transport: Some(Transport::Trip(0)),
            start_time: 210,
            start_stop: Some(1),
            arrival_time: Some(300),
            arrival_stop: Some(2),
        };
        s[2] = StopState {
            transport: Some(Transport::Walking),
            start_time: 340,
            start_stop: Some(2),
            arrival_time: Some(400),
            arrival_stop: Some(3),
        };

        let journey = extract_journey(&s, 0, 3).expect("journey should be found");
        assert_eq!(journey.depart_time, 100);
        assert_eq!(journey.arrive_time, 400);
        assert_eq!(journey.legs.len(), 2);
        assert_eq!(journey.legs[0].board_stop, 0);
        assert_eq!(journey.legs[0].alight_stop, 2);
        assert_eq!(journey.legs[0].arrive_time, 300);
        assert_eq!(journey.legs[1].transport, Transport::Walking);
    }

    #[test]
    fn unreachable_origin_yields_no_journey() {
        let s = empty(2);
        assert_eq!(extract_journey(&s, 0, 1), None);
    }

    #[test]
    fn origin_equals_destination_yields_an_empty_journey() {
        let mut s = empty(1);
        s[0] = StopState {
            transport: None,
            start_time: 500,
            start_stop: Some(0),
            arrival_time: Some(500),
            arrival_stop: None,
        };
        let journey = extract_journey(&s, 0, 0).unwrap();
        assert!(journey.legs.is_empty());
        assert_eq!(journey.depart_time, 500);
        assert_eq!(journey.arrive_time, 500);
    }
}
