//! Loads a timetable from external input into a [`crate::model::TimetableStore`].

mod csv;

pub use csv::load_from_csv;
