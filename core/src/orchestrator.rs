//! Top-level entry point: wires the reverse scan, journey extraction,
//! k-alternatives enumeration, and confidence composition into one call.

use serde::Serialize;

use crate::confidence::journey_confidence;
use crate::error::Error;
use crate::model::{StopId, Time, TimetableStore};
use crate::predictor::DelayPredictor;
use crate::routing::{enumerate_journeys, Journey};

/// A journey paired with its composed success confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredJourney {
    pub journey: Journey,
    pub confidence: f64,
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Finds up to `k` distinct journeys from `origin` to `destination` that
/// arrive by `deadline`, scores each by its predicted success confidence,
/// drops those below `threshold`, and returns the rest ranked highest
/// confidence first.
///
/// Ties in confidence are broken by later arrival first, then by fewer
/// legs, so the ordering is deterministic for a given timetable and
/// predictor.
///
/// A journey whose predictor call fails is logged and dropped rather than
/// failing the whole query: only the enumerator's own journeys are
/// affected, not the batch.
///
/// # Errors
///
/// Returns [`Error::UnknownStop`] for an out-of-range `origin` or
/// `destination`, and [`Error::InvalidTime`] if `deadline` is outside
/// `[0, 86_400)`.
pub fn find_journeys(
    store: &TimetableStore,
    origin: StopId,
    destination: StopId,
    deadline: Time,
    k: usize,
    threshold: f64,
    predictor: &dyn DelayPredictor,
) -> Result<Vec<ScoredJourney>, Error> {
    if i64::from(deadline) >= SECONDS_PER_DAY {
        return Err(Error::InvalidTime(i64::from(deadline)));
    }
    store.validate_stop(origin)?;
    store.validate_stop(destination)?;

    let journeys = enumerate_journeys(store, origin, destination, deadline, k, &|| true)?;

    let mut scored = Vec::with_capacity(journeys.len());
    for journey in journeys {
        let confidence = match journey_confidence(&journey, deadline, predictor) {
            Ok(confidence) => confidence,
            Err(err) => {
                log::warn!(
                    "dropping journey {} -> {} arriving {}: {err}",
                    journey.origin,
                    journey.destination,
                    journey.arrive_time
                );
                continue;
            }
        };
        if confidence >= threshold {
            scored.push(ScoredJourney {
                journey,
                confidence,
            });
        }
    }

    scored.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.journey.arrive_time.cmp(&a.journey.arrive_time))
            .then_with(|| a.journey.legs.len().cmp(&b.journey.legs.len()))
    });

    Ok(scored)
}
