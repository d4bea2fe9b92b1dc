//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use drishti_track::drivers::{Curve, PoseFilter, Protocol, SampleSource};
use drishti_track::mapping::{AxisCurves, MappingTable};
use drishti_track::{Error, Pose, Result, Tracker};
use parking_lot::Mutex;

/// Sample source fed from the test thread.
///
/// Returns the front of the queue while more than one sample is queued,
/// then keeps repeating the last one.
#[derive(Clone, Default)]
pub struct FeedSource {
    queue: Arc<Mutex<VecDeque<[f64; 6]>>>,
}

impl FeedSource {
    pub fn new(initial: [f64; 6]) -> Self {
        let source = Self::default();
        source.push(initial);
        source
    }

    /// Replace whatever is queued with `sample`.
    pub fn set(&self, sample: [f64; 6]) {
        let mut queue = self.queue.lock();
        queue.clear();
        queue.push_back(sample);
    }

    pub fn push(&self, sample: [f64; 6]) {
        self.queue.lock().push_back(sample);
    }
}

impl SampleSource for FeedSource {
    fn fetch(&mut self) -> [f64; 6] {
        let mut queue = self.queue.lock();
        if queue.len() > 1 {
            return queue.pop_front().unwrap_or([f64::NAN; 6]);
        }
        queue.front().copied().unwrap_or([f64::NAN; 6])
    }
}

/// Protocol that records every pose; can be switched to fail.
#[derive(Clone, Default)]
pub struct RecordingProtocol {
    pub sent: Arc<Mutex<Vec<Pose>>>,
    pub fail: Arc<AtomicBool>,
}

impl RecordingProtocol {
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn last(&self) -> Option<Pose> {
        self.sent.lock().last().copied()
    }
}

impl Protocol for RecordingProtocol {
    fn send(&mut self, pose: &Pose) -> Result<()> {
        self.sent.lock().push(*pose);
        if self.fail.load(Ordering::SeqCst) {
            Err(Error::Protocol("receiver unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Pass-through filter that counts center calls.
#[derive(Clone, Default)]
pub struct CountingFilter {
    pub centers: Arc<AtomicUsize>,
    pub filtered: Arc<AtomicUsize>,
}

impl PoseFilter for CountingFilter {
    fn center(&mut self) {
        self.centers.fetch_add(1, Ordering::SeqCst);
    }

    fn filter(&mut self, input: &Pose) -> Pose {
        self.filtered.fetch_add(1, Ordering::SeqCst);
        *input
    }
}

/// Identity curve that records its activity flag.
#[derive(Default)]
pub struct RecordingCurve {
    active: AtomicBool,
    pub evaluations: AtomicUsize,
}

impl RecordingCurve {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Curve for RecordingCurve {
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        x
    }
}

/// Mapping table over twelve recording curves, primary then alternate per
/// axis.
pub fn recording_table() -> (MappingTable, Vec<Arc<RecordingCurve>>) {
    let curves: Vec<Arc<RecordingCurve>> = (0..12).map(|_| Arc::new(RecordingCurve::default())).collect();
    let table = MappingTable::new(std::array::from_fn(|i| {
        AxisCurves::new(curves[2 * i].clone(), curves[2 * i + 1].clone())
    }));
    (table, curves)
}

/// Poll `condition` until it holds or two seconds pass.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Wait for `n` more cycles to complete.
pub fn wait_cycles(tracker: &Tracker, n: u64) -> bool {
    let target = tracker.cycle_count() + n;
    wait_until(|| tracker.cycle_count() >= target)
}
