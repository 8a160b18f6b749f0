//! Turns per-leg delay predictions into a single success-confidence score
//! for a journey.

use crate::error::Error;
use crate::model::{mod_diff, Time, Transport};
use crate::predictor::DelayPredictor;
use crate::routing::Journey;

/// Probability that a single transfer survives a predicted delay.
///
/// `predicted_delay` is the mean of an exponential delay distribution for
/// the arriving vehicle; `slack` is the buffer until the next scheduled
/// event (the next vehicle's departure, or the deadline for the last one),
/// net of any walking time spent in between.
///
/// A non-positive predicted delay means the model expects the vehicle to
/// be exactly on time or early, so the transfer always survives regardless
/// of slack. Otherwise the transfer survives if the realized delay does
/// not exceed the slack, which for an exponential distribution is
/// `1 - exp(-slack / predicted_delay)`. A positive predicted delay with no
/// slack at all can never survive.
#[must_use]
pub fn transfer_confidence(predicted_delay: f64, slack: f64) -> f64 {
    if predicted_delay <= 0.0 {
        1.0
    } else if slack > 0.0 {
        1.0 - (-slack / predicted_delay).exp()
    } else {
        0.0
    }
}

/// Composes the whole-journey success confidence.
///
/// Only vehicle legs carry delay risk; a walking leg merely eats into the
/// slack of the transfer that follows it. Walking time is accumulated and
/// charged against the next vehicle-to-vehicle transfer (or, for the
/// trailing walk, against the deadline) rather than scored on its own.
///
/// # Errors
///
/// Propagates [`Error::PredictorFailure`] from the delay predictor, and
/// returns [`Error::PredictorFailure`] itself if the predictor's batch
/// reply doesn't match the query batch in length.
pub(crate) fn journey_confidence(
    journey: &Journey,
    deadline: Time,
    predictor: &dyn DelayPredictor,
) -> Result<f64, Error> {
    if journey.legs.is_empty() {
        return Ok(1.0);
    }

    let queries: Vec<_> = journey
        .legs
        .iter()
        .map(|leg| (leg.alight_stop, leg.arrive_time))
        .collect();
    let delays = predictor.predict(&queries)?;
    if delays.len() != queries.len() {
        return Err(Error::PredictorFailure(format!(
            "predictor returned {} delays for {} queries",
            delays.len(),
            queries.len()
        )));
    }

    let mut confidence = 1.0;
    let mut walking_time = 0.0;
    let mut last_vehicle: Option<(Time, f64)> = None;

    for (leg, &delay) in journey.legs.iter().zip(&delays) {
        match leg.transport {
            Transport::Walking => {
                walking_time += mod_diff(leg.arrive_time, leg.depart_time) as f64;
            }
            Transport::Trip(_) => {
                if let Some((last_arrival, last_delay)) = last_vehicle {
                    let slack = mod_diff(leg.depart_time, last_arrival) as f64 - walking_time;
                    confidence *= transfer_confidence(last_delay, slack);
                }
                last_vehicle = Some((leg.arrive_time, delay));
                walking_time = 0.0;
            }
        }
    }

    if let Some((last_arrival, last_delay)) = last_vehicle {
        let slack = mod_diff(deadline, last_arrival) as f64 - walking_time;
        confidence *= transfer_confidence(last_delay, slack);
    }

    Ok(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Leg;

    struct FixedDelay(f64);

    impl DelayPredictor for FixedDelay {
        fn predict(&self, queries: &[(crate::model::StopId, Time)]) -> Result<Vec<f64>, Error> {
            Ok(vec![self.0; queries.len()])
        }
    }

    #[test]
    fn non_positive_delay_always_succeeds() {
        assert_eq!(transfer_confidence(0.0, 0.0), 1.0);
        assert_eq!(transfer_confidence(-5.0, 100.0), 1.0);
    }

    #[test]
    fn no_slack_with_expected_delay_always_fails() {
        assert_eq!(transfer_confidence(30.0, 0.0), 0.0);
        assert_eq!(transfer_confidence(30.0, -10.0), 0.0);
    }

    #[test]
    fn matches_the_exponential_cdf_at_equal_delay_and_slack() {
        let confidence = transfer_confidence(100.0, 100.0);
        assert!((confidence - (1.0 - std::f64::consts::E.recip())).abs() < 1e-9);
    }

    #[test]
    fn empty_journey_has_full_confidence() {
        let journey = Journey {
            origin: 0,
            destination: 0,
            depart_time: 100,
            arrive_time: 100,
            legs: Vec::new(),
        };
        let confidence = journey_confidence(&journey, 100, &FixedDelay(0.0)).unwrap();
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn zero_predicted_delay_gives_full_confidence() {
        let journey = Journey {
            origin: 0,
            destination: 3,
            depart_time: 28_800,
            arrive_time: 30_000,
            legs: vec![
                Leg {
                    transport: Transport::Trip(0),
                    board_stop: 0,
                    depart_time: 28_800,
                    alight_stop: 2,
                    arrive_time: 30_000,
                },
                Leg {
                    transport: Transport::Walking,
                    board_stop: 2,
                    depart_time: 30_000,
                    alight_stop: 3,
                    arrive_time: 30_060,
                },
            ],
        };
        let confidence = journey_confidence(&journey, 31_200, &FixedDelay(0.0)).unwrap();
        assert_eq!(confidence, 1.0);
    }

    /// Mirrors the worked "walk eats into the final transfer's slack"
    /// scenario: a vehicle leg arrives at 30000, a 60s walk follows, and
    /// the deadline is exactly the vehicle's arrival time, leaving no
    /// slack once the walk is charged against it.
    #[test]
    fn trailing_walk_against_a_tight_deadline_fails_with_positive_delay() {
        let journey = Journey {
            origin: 0,
            destination: 3,
            depart_time: 28_800,
            arrive_time: 30_060,
            legs: vec![
                Leg {
                    transport: Transport::Trip(0),
                    board_stop: 0,
                    depart_time: 28_800,
                    alight_stop: 2,
                    arrive_time: 30_000,
                },
                Leg {
                    transport: Transport::Walking,
                    board_stop: 2,
                    depart_time: 30_000,
                    alight_stop: 3,
                    arrive_time: 30_060,
                },
            ],
        };
        let confidence = journey_confidence(&journey, 30_000, &FixedDelay(60.0)).unwrap();
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn transfer_confidence_is_monotone_in_slack() {
        let low = transfer_confidence(30.0, 10.0);
        let mid = transfer_confidence(30.0, 30.0);
        let high = transfer_confidence(30.0, 90.0);
        assert!(low < mid);
        assert!(mid < high);
        assert!(high < 1.0);
    }

    #[test]
    fn transfer_confidence_stays_within_unit_range() {
        for delay in [-10.0, 0.0, 5.0, 30.0, 1000.0] {
            for slack in [-50.0, 0.0, 1.0, 30.0, 500.0] {
                let confidence = transfer_confidence(delay, slack);
                assert!((0.0..=1.0).contains(&confidence));
            }
        }
    }

    #[test]
    fn journey_confidence_is_deterministic_for_the_same_inputs() {
        let journey = Journey {
            origin: 0,
            destination: 2,
            depart_time: 0,
            arrive_time: 200,
            legs: vec![
                Leg {
                    transport: Transport::Trip(0),
                    board_stop: 0,
                    depart_time: 0,
                    alight_stop: 1,
                    arrive_time: 100,
                },
                Leg {
                    transport: Transport::Trip(1),
                    board_stop: 1,
                    depart_time: 110,
                    alight_stop: 2,
                    arrive_time: 200,
                },
            ],
        };
        let a = journey_confidence(&journey, 250, &FixedDelay(20.0)).unwrap();
        let b = journey_confidence(&journey, 250, &FixedDelay(20.0)).unwrap();
        assert_eq!(a, b);
    }

    struct WrongLengthPredictor;

    impl DelayPredictor for WrongLengthPredictor {
        fn predict(&self, queries: &[(crate::model::StopId, Time)]) -> Result<Vec<f64>, Error> {
            Ok(vec![0.0; queries.len().saturating_sub(1)])
        }
    }

    #[test]
    fn a_wrong_length_batch_is_a_predictor_failure() {
        let journey = Journey {
            origin: 0,
            destination: 2,
            depart_time: 0,
            arrive_time: 200,
            legs: vec![
                Leg {
                    transport: Transport::Trip(0),
                    board_stop: 0,
                    depart_time: 0,
                    alight_stop: 1,
                    arrive_time: 100,
                },
                Leg {
                    transport: Transport::Trip(1),
                    board_stop: 1,
                    depart_time: 110,
                    alight_stop: 2,
                    arrive_time: 200,
                },
            ],
        };
        let err = journey_confidence(&journey, 250, &WrongLengthPredictor).unwrap_err();
        assert!(matches!(err, Error::PredictorFailure(_)));
    }

    #[test]
    fn composes_confidence_across_vehicle_transfers_as_a_product() {
        let journey = Journey {
            origin: 0,
            destination: 2,
            depart_time: 0,
            arrive_time: 200,
            legs: vec![
                Leg {
                    transport: Transport::Trip(0),
                    board_stop: 0,
                    depart_time: 0,
                    alight_stop: 1,
                    arrive_time: 100,
                },
                Leg {
                    transport: Transport::Trip(1),
                    board_stop: 1,
                    depart_time: 110,
                    alight_stop: 2,
                    arrive_time: 200,
                },
            ],
        };
        // No walking between the two vehicle legs, so the first transfer's
        // slack is exactly 110 - 100 = 10s; the final factor's slack is
        // 250 - 200 = 50s against the deadline.
        let confidence = journey_confidence(&journey, 250, &FixedDelay(20.0)).unwrap();
        let expected = transfer_confidence(20.0, 10.0) * transfer_confidence(20.0, 50.0);
        assert!((confidence - expected).abs() < 1e-12);
    }
}
