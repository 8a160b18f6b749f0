//! Delay prediction capability consumed by the confidence composer.
//!
//! The core treats delay prediction as an opaque batch call: given stops
//! and times, produce matching non-negative predicted delays in seconds.
//! Real deployments back this with a learned model; the variants here
//! cover the trivial and table-backed cases.

use hashbrown::HashMap;

use crate::error::Error;
use crate::model::{StopId, Time};

/// `predict` takes a batch of `(stop, time)` pairs and returns the
/// matching batch of predicted mean arrival delays, preserving order.
pub trait DelayPredictor {
    /// # Errors
    ///
    /// Implementations should return [`Error::PredictorFailure`] rather
    /// than panicking on model failure; the orchestrator drops the
    /// affected journey and continues.
    fn predict(&self, queries: &[(StopId, Time)]) -> Result<Vec<f64>, Error>;
}

/// Assumes every vehicle runs exactly on schedule.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroDelayPredictor;

impl DelayPredictor for ZeroDelayPredictor {
    fn predict(&self, queries: &[(StopId, Time)]) -> Result<Vec<f64>, Error> {
        Ok(vec![0.0; queries.len()])
    }
}

/// Applies the same predicted delay to every stop and time.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDelayPredictor {
    pub delay_seconds: f64,
}

impl DelayPredictor for ConstantDelayPredictor {
    fn predict(&self, queries: &[(StopId, Time)]) -> Result<Vec<f64>, Error> {
        Ok(vec![self.delay_seconds; queries.len()])
    }
}

/// Looks up a precomputed mean delay per `(stop, time)` pair, falling back
/// to a default for combinations that were never observed.
#[derive(Debug, Clone, Default)]
pub struct TableDelayPredictor {
    table: HashMap<(StopId, Time), f64>,
    default_delay: f64,
}

impl TableDelayPredictor {
    #[must_use]
    pub fn new(table: HashMap<(StopId, Time), f64>, default_delay: f64) -> Self {
        Self {
            table,
            default_delay,
        }
    }
}

impl DelayPredictor for TableDelayPredictor {
    fn predict(&self, queries: &[(StopId, Time)]) -> Result<Vec<f64>, Error> {
        Ok(queries
            .iter()
            .map(|q| *self.table.get(q).unwrap_or(&self.default_delay))
            .collect())
    }
}
