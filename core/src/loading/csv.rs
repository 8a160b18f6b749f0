//! Builds a [`TimetableStore`] from three CSV files: stops, connections, and
//! footpaths, interning their string ids into the contiguous indices the
//! routing engine expects.

use std::fs::File;
use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::error::Error;
use crate::model::{Connection, Footpath, Stop, StopId, TimetableStore, TripId};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawStop {
    stop_id: String,
    name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawConnection {
    trip_id: String,
    dep_stop: String,
    arr_stop: String,
    dep_time: String,
    arr_time: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawFootpath {
    stop_id_a: String,
    stop_id_b: String,
    duration: String,
}

fn read_rows<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(path)?;
    csv::Reader::from_reader(file)
        .into_deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(Error::from)
}

/// Parses a `HH:MM:SS` or bare-seconds timestamp into seconds since
/// midnight.
fn parse_time(raw: &str, context: &str) -> Result<u32, Error> {
    let bad = || Error::TimetableInconsistency(format!("{context}: invalid time {raw:?}"));

    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [seconds] => seconds.parse().map_err(|_| bad()),
        [hours, minutes, seconds] => {
            let h: u32 = hours.parse().map_err(|_| bad())?;
            let m: u32 = minutes.parse().map_err(|_| bad())?;
            let s: u32 = seconds.parse().map_err(|_| bad())?;
            Ok(h * 3600 + m * 60 + s)
        }
        _ => Err(bad()),
    }
}

fn parse_optional_f64(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        None
    } else {
        raw.parse().ok()
    }
}

/// Loads a timetable from `stops.csv`, `connections.csv`, and
/// `footpaths.csv` under the given paths.
///
/// Stop ids are interned in the order stops are read; connection and trip
/// ids are assigned in the order connections are read, so rows sharing a
/// `trip_id` string receive the same contiguous [`TripId`].
///
/// # Errors
///
/// Returns [`Error::Io`] if a file can't be read, [`Error::Csv`] for a
/// malformed row, and [`Error::TimetableInconsistency`] for a time that
/// doesn't parse or a row referencing a stop id absent from `stops.csv`.
pub fn load_from_csv(
    stops_path: &Path,
    connections_path: &Path,
    footpaths_path: &Path,
) -> Result<TimetableStore, Error> {
    let raw_stops: Vec<RawStop> = read_rows(stops_path)?;
    let mut stop_index: HashMap<String, StopId> = HashMap::with_capacity(raw_stops.len());
    let mut stops = Vec::with_capacity(raw_stops.len());
    for raw in raw_stops {
        let id = stops.len();
        stop_index.insert(raw.stop_id.clone(), id);
        stops.push(Stop {
            id,
            external_id: raw.stop_id,
            name: (!raw.name.is_empty()).then_some(raw.name),
            lat: parse_optional_f64(&raw.lat),
            lon: parse_optional_f64(&raw.lon),
        });
    }

    let resolve_stop = |external: &str| -> Result<StopId, Error> {
        stop_index.get(external).copied().ok_or_else(|| {
            Error::TimetableInconsistency(format!("unknown stop id {external:?}"))
        })
    };

    let raw_connections: Vec<RawConnection> = read_rows(connections_path)?;
    let mut trip_index: HashMap<String, TripId> = HashMap::new();
    let mut connections = Vec::with_capacity(raw_connections.len());
    for (connection_id, raw) in raw_connections.into_iter().enumerate() {
        let next_trip_id = trip_index.len();
        let trip_id = *trip_index.entry(raw.trip_id).or_insert(next_trip_id);
        connections.push(Connection {
            connection_id,
            trip_id,
            dep_stop: resolve_stop(&raw.dep_stop)?,
            arr_stop: resolve_stop(&raw.arr_stop)?,
            dep_time: parse_time(&raw.dep_time, "connection dep_time")?,
            arr_time: parse_time(&raw.arr_time, "connection arr_time")?,
        });
    }

    let raw_footpaths: Vec<RawFootpath> = read_rows(footpaths_path)?;
    let mut footpaths = Vec::with_capacity(raw_footpaths.len());
    for raw in raw_footpaths {
        footpaths.push(Footpath {
            stop_a: resolve_stop(&raw.stop_id_a)?,
            stop_b: resolve_stop(&raw.stop_id_b)?,
            duration: parse_time(&raw.duration, "footpath duration")?,
        });
    }

    log::info!(
        "loaded {} stops, {} connections, {} footpaths",
        stops.len(),
        connections.len(),
        footpaths.len()
    );

    TimetableStore::build(stops, connections, footpaths)
}
