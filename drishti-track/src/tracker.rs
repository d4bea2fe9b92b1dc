//! Tracker - periodic pose producer
//!
//! Owns the producer thread and the control surface around it. The thread
//! runs [`TrackingPipeline`] once per period and publishes each cycle's
//! `(mapped, raw)` pair; any number of threads may read it concurrently.
//!
//! # State machine
//!
//! ```text
//! Idle ──start()──► Running ──stop()/drop──► Stopping ──► Stopped
//!   └───────────────────stop()/drop──────────────────────────┘
//! ```
//!
//! Stopping is cooperative: the thread finishes its current cycle, sends a
//! neutral pose, releases all curves and only then reports `Stopped`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::config::TrackerSettings;
use crate::error::{Error, Result};
use crate::output::{OutputReader, PublishedOutput};
use crate::pipeline::{Collaborators, CycleFlags, TrackingPipeline};
use crate::pose::Pose;

/// Floor for the end-of-cycle sleep.
const MIN_SLEEP: Duration = Duration::from_micros(1);

/// Lifecycle of a [`Tracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Constructed, thread not started.
    Idle,
    /// Producer thread cycling.
    Running,
    /// Stop requested, thread finishing.
    Stopping,
    /// Thread gone; terminal.
    Stopped,
}

/// State shared between the handle and the producer thread.
struct Shared {
    state: Mutex<TrackerState>,
    /// Centering requests made so far.
    center_requested: AtomicU64,
    /// Requests covered by the latest centering.
    center_served: AtomicU64,
    enabled: AtomicBool,
    zero: AtomicBool,
    settings: RwLock<Arc<TrackerSettings>>,
    output: Arc<PublishedOutput>,
    cycles: AtomicU64,
}

/// Real-time head tracker.
///
/// # Example
///
/// ```no_run
/// use drishti_track::devices::mock::{SyntheticHead, SyntheticHeadConfig};
/// use drishti_track::drivers::LogProtocol;
/// use drishti_track::{Collaborators, Tracker, TrackerSettings};
///
/// # fn main() -> drishti_track::Result<()> {
/// let collaborators = Collaborators::new(
///     Box::new(SyntheticHead::new(SyntheticHeadConfig::default())),
///     Box::new(LogProtocol::default()),
/// );
/// let mut tracker = Tracker::new(TrackerSettings::default(), collaborators)?;
/// tracker.start()?;
///
/// tracker.request_center();
/// let (mapped, raw) = tracker.read_output();
/// println!("mapped: {mapped}, raw: {raw}");
///
/// tracker.stop()?;
/// # Ok(())
/// # }
/// ```
pub struct Tracker {
    shared: Arc<Shared>,
    /// Present until the thread takes it.
    pipeline: Option<TrackingPipeline>,
    thread: Option<JoinHandle<()>>,
}

impl Tracker {
    /// Create an idle tracker.
    ///
    /// A centering request is queued up front when
    /// `settings.center_at_startup` is set.
    pub fn new(settings: TrackerSettings, collaborators: Collaborators) -> Result<Self> {
        settings.validate()?;

        let shared = Arc::new(Shared {
            state: Mutex::new(TrackerState::Idle),
            center_requested: AtomicU64::new(u64::from(settings.center_at_startup)),
            center_served: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
            zero: AtomicBool::new(false),
            settings: RwLock::new(Arc::new(settings)),
            output: Arc::new(PublishedOutput::new()),
            cycles: AtomicU64::new(0),
        });

        Ok(Self {
            shared,
            pipeline: Some(TrackingPipeline::new(collaborators)),
            thread: None,
        })
    }

    // === Lifecycle ===

    /// Spawn the producer thread. Only valid from [`TrackerState::Idle`].
    pub fn start(&mut self) -> Result<()> {
        let pipeline = {
            let mut state = self.shared.state.lock();
            if *state != TrackerState::Idle {
                return Err(Error::InvalidState {
                    expected: TrackerState::Idle,
                    actual: *state,
                });
            }
            let pipeline = self
                .pipeline
                .take()
                .ok_or_else(|| Error::Other("tracker pipeline already consumed".to_string()))?;
            *state = TrackerState::Running;
            pipeline
        };

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("drishti-tracker".to_string())
            .spawn(move || run_loop(shared, pipeline));

        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                log::info!(
                    "Tracker: Started at {}ms period",
                    self.shared.settings.read().period_ms
                );
                Ok(())
            }
            Err(e) => {
                *self.shared.state.lock() = TrackerState::Stopped;
                Err(Error::ThreadSpawn(e))
            }
        }
    }

    /// Stop the producer thread and wait for it to finish.
    ///
    /// Idempotent. Stopping an idle tracker moves it straight to
    /// [`TrackerState::Stopped`].
    pub fn stop(&mut self) -> Result<()> {
        {
            let mut state = self.shared.state.lock();
            match *state {
                TrackerState::Running => {
                    log::info!("Tracker: Stop requested");
                    *state = TrackerState::Stopping;
                }
                TrackerState::Idle => {
                    *state = TrackerState::Stopped;
                    self.pipeline = None;
                }
                TrackerState::Stopping | TrackerState::Stopped => {}
            }
        }

        if let Some(handle) = self.thread.take()
            && handle.join().is_err()
        {
            *self.shared.state.lock() = TrackerState::Stopped;
            return Err(Error::ThreadPanicked);
        }
        Ok(())
    }

    pub fn state(&self) -> TrackerState {
        *self.shared.state.lock()
    }

    // === Control ===

    /// Treat the next usable sample as the new zero pose.
    ///
    /// The request stays pending until a cycle that started after it sees a
    /// finite, non-zero sample.
    pub fn request_center(&self) {
        log::debug!("Tracker: Center requested");
        self.shared.center_requested.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_center_pending(&self) -> bool {
        self.shared.center_served.load(Ordering::Acquire)
            < self.shared.center_requested.load(Ordering::Acquire)
    }

    /// Accept (true) or freeze (false) incoming samples.
    pub fn set_enabled(&self, enabled: bool) {
        log::info!("Tracker: Tracking {}", if enabled { "enabled" } else { "disabled" });
        self.shared.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::Acquire)
    }

    /// Force every output axis to 0 while set.
    pub fn set_zero(&self, zero: bool) {
        self.shared.zero.store(zero, Ordering::Release);
    }

    pub fn is_zeroed(&self) -> bool {
        self.shared.zero.load(Ordering::Acquire)
    }

    /// Replace the settings snapshot; applies from the next cycle.
    pub fn update_settings(&self, settings: TrackerSettings) -> Result<()> {
        settings.validate()?;
        *self.shared.settings.write() = Arc::new(settings);
        log::info!("Tracker: Settings updated");
        Ok(())
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<TrackerSettings> {
        self.shared.settings.read().clone()
    }

    // === Output ===

    /// Latest `(mapped, raw)` pair.
    pub fn read_output(&self) -> (Pose, Pose) {
        self.shared.output.read()
    }

    /// Read-only handle for other threads.
    pub fn reader(&self) -> OutputReader {
        OutputReader::new(Arc::clone(&self.shared.output))
    }

    /// Completed cycles.
    pub fn cycle_count(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("Tracker: Failed to stop cleanly: {}", e);
        }
    }
}

/// Producer thread body.
fn run_loop(shared: Arc<Shared>, mut pipeline: TrackingPipeline) {
    log::info!("Tracker: Loop started");
    let mut overrun_count: u64 = 0;

    while *shared.state.lock() == TrackerState::Running {
        let cycle_start = Instant::now();
        let settings = shared.settings.read().clone();

        // Requests arriving after this snapshot stay pending for a later cycle.
        let requested = shared.center_requested.load(Ordering::Acquire);
        let flags = CycleFlags {
            enabled: shared.enabled.load(Ordering::Acquire),
            zero: shared.zero.load(Ordering::Acquire),
            center_pending: shared.center_served.load(Ordering::Acquire) < requested,
        };

        let cycle = pipeline.run_cycle(&settings, flags);
        if cycle.centered {
            shared.center_served.store(requested, Ordering::Release);
        }
        shared.output.publish(cycle.mapped, cycle.raw);
        shared.cycles.fetch_add(1, Ordering::Relaxed);

        let period = settings.period();
        let elapsed = cycle_start.elapsed();
        if elapsed > period {
            overrun_count += 1;
            if overrun_count % 100 == 1 {
                log::warn!(
                    "Tracker: Cycle overrun - {:.2}ms (target: {}ms), {} overruns",
                    elapsed.as_secs_f64() * 1000.0,
                    settings.period_ms,
                    overrun_count
                );
            }
        }

        thread::sleep(sleep_for(period, elapsed));
    }

    pipeline.shutdown();
    *shared.state.lock() = TrackerState::Stopped;

    let gate = pipeline.gate();
    log::info!(
        "Tracker: Loop stopped after {} cycles ({} rejected values, {} send failures)",
        shared.cycles.load(Ordering::Relaxed),
        gate.total_rejected(),
        pipeline.send_failures()
    );
}

/// Time left in the cycle, never less than [`MIN_SLEEP`].
fn sleep_for(period: Duration, elapsed: Duration) -> Duration {
    period.saturating_sub(elapsed).max(MIN_SLEEP)
}
