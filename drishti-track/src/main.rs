//! Drishti - head-tracking daemon
//!
//! Runs the tracker against the synthetic head source and logs the
//! published pose once per second. Stops on Ctrl-C or after `--duration`.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use drishti_track::devices::mock::SyntheticHead;
use drishti_track::drivers::LogProtocol;
use drishti_track::{Collaborators, DrishtiConfig, Error, Result, Tracker};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(author, version, about = "Drishti head-tracking daemon", long_about = None)]
struct Args {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request centering this many seconds after start
    #[arg(long)]
    center_after: Option<f64>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    duration: Option<f64>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DrishtiConfig::from_file(path)?,
        None => DrishtiConfig::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Drishti v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => log::info!("Using config: {}", path.display()),
        None => log::info!("Using built-in defaults"),
    }

    if let Some(path) = &args.dump_config {
        config.to_file(path)?;
        log::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let collaborators = Collaborators::new(
        Box::new(SyntheticHead::new(config.source.clone())),
        Box::new(LogProtocol::new(REPORT_INTERVAL)),
    );
    let mut tracker = Tracker::new(config.tracker.clone(), collaborators)?;
    tracker.start()?;

    let started = Instant::now();
    let mut last_report = Instant::now();
    let mut center_sent = false;

    while running.load(Ordering::Relaxed) {
        thread::sleep(POLL_INTERVAL);
        let uptime = started.elapsed().as_secs_f64();

        if let Some(after) = args.center_after
            && !center_sent
            && uptime >= after
        {
            log::info!("Centering after {:.1}s", uptime);
            tracker.request_center();
            center_sent = true;
        }

        if let Some(limit) = args.duration
            && uptime >= limit
        {
            log::info!("Run duration reached ({:.1}s)", limit);
            break;
        }

        if last_report.elapsed() >= REPORT_INTERVAL {
            let (mapped, raw) = tracker.read_output();
            log::info!("mapped: {}", mapped);
            log::debug!("raw:    {}", raw);
            last_report = Instant::now();
        }
    }

    tracker.stop()?;
    log::info!("Shutdown complete ({} cycles)", tracker.cycle_count());
    Ok(())
}
