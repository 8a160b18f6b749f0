//! Reverse-time connection scan routing over a timetable, with journey
//! confidence scored from predicted arrival delays.

pub mod confidence;
pub mod error;
pub mod loading;
pub mod model;
pub mod orchestrator;
pub mod predictor;
pub mod routing;

pub use confidence::transfer_confidence;
pub use error::Error;
pub use loading::load_from_csv;
pub use model::{Connection, Footpath, Stop, StopId, Time, TimetableStore, Transport, TripId};
pub use orchestrator::{find_journeys, ScoredJourney};
pub use predictor::{ConstantDelayPredictor, DelayPredictor, TableDelayPredictor, ZeroDelayPredictor};
pub use routing::{Journey, Leg};
