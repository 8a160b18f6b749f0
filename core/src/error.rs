use thiserror::Error;

use crate::model::StopId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown stop id {0}")]
    UnknownStop(StopId),
    #[error("arrival time {0} is outside [0, 86400)")]
    InvalidTime(i64),
    #[error("timetable inconsistency: {0}")]
    TimetableInconsistency(String),
    #[error("delay predictor failed: {0}")]
    PredictorFailure(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
