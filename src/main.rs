use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use transit_confidence_core::{
    find_journeys, load_from_csv, ConstantDelayPredictor, DelayPredictor, StopId, Time,
    TimetableStore, ZeroDelayPredictor,
};

/// Finds journeys through a timetable that arrive by a deadline, ranked by
/// predicted success confidence.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to connections.csv
    #[arg(long)]
    connections: PathBuf,
    /// Path to footpaths.csv
    #[arg(long)]
    footpaths: PathBuf,
    /// Path to stops.csv
    #[arg(long)]
    stops: PathBuf,
    /// External id of the origin stop
    #[arg(long)]
    origin: String,
    /// External id of the destination stop
    #[arg(long)]
    destination: String,
    /// Latest acceptable arrival time, HH:MM:SS
    #[arg(long)]
    arrival: String,
    /// Maximum number of distinct journeys to return
    #[arg(long, default_value_t = 5)]
    k: usize,
    /// Minimum success confidence to keep a journey
    #[arg(long, default_value_t = 0.7)]
    threshold: f64,
    /// Flat predicted delay, in seconds, applied to every arrival; omit to
    /// assume vehicles run exactly on schedule
    #[arg(long)]
    delay: Option<f64>,
}

fn parse_arrival(raw: &str) -> Result<Time> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [h, m, s] = parts.as_slice() else {
        return Err(anyhow!("arrival time {raw:?} is not HH:MM:SS"));
    };
    let h: u32 = h.parse().with_context(|| format!("invalid hour in {raw:?}"))?;
    let m: u32 = m.parse().with_context(|| format!("invalid minute in {raw:?}"))?;
    let s: u32 = s.parse().with_context(|| format!("invalid second in {raw:?}"))?;
    Ok(h * 3600 + m * 60 + s)
}

fn resolve_stop(store: &TimetableStore, external_id: &str) -> Result<StopId> {
    store
        .stops()
        .iter()
        .find(|stop| stop.external_id == external_id)
        .map(|stop| stop.id)
        .ok_or_else(|| anyhow!("no stop with id {external_id:?} in the loaded timetable"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let store = load_from_csv(&args.stops, &args.connections, &args.footpaths)
        .context("loading timetable")?;

    let origin = resolve_stop(&store, &args.origin)?;
    let destination = resolve_stop(&store, &args.destination)?;
    let deadline = parse_arrival(&args.arrival)?;

    let predictor: Box<dyn DelayPredictor> = match args.delay {
        Some(delay_seconds) => Box::new(ConstantDelayPredictor { delay_seconds }),
        None => Box::new(ZeroDelayPredictor),
    };

    let scored = find_journeys(
        &store,
        origin,
        destination,
        deadline,
        args.k,
        args.threshold,
        predictor.as_ref(),
    )
    .context("finding journeys")?;

    println!("{}", serde_json::to_string_pretty(&scored)?);
    log::info!(
        "found {} journey(s) above confidence {}",
        scored.len(),
        args.threshold
    );
    Ok(())
}
