//! Published output shared with reader threads.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::pose::Pose;

/// Mapped and raw pose of one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Snapshot {
    mapped: Pose,
    raw: Pose,
}

/// Latest `(mapped, raw)` pair, replaced as a unit once per cycle.
#[derive(Debug, Default)]
pub struct PublishedOutput {
    inner: Mutex<Snapshot>,
}

impl PublishedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both poses at once.
    pub fn publish(&self, mapped: Pose, raw: Pose) {
        *self.inner.lock() = Snapshot { mapped, raw };
    }

    /// Copy of the latest `(mapped, raw)` pair.
    pub fn read(&self) -> (Pose, Pose) {
        let snapshot = *self.inner.lock();
        (snapshot.mapped, snapshot.raw)
    }
}

/// Cloneable read-only handle to a tracker's output.
///
/// ```
/// use drishti_track::output::{OutputReader, PublishedOutput};
/// use drishti_track::Pose;
/// use std::sync::Arc;
///
/// let output = Arc::new(PublishedOutput::new());
/// let reader = OutputReader::new(Arc::clone(&output));
/// output.publish(Pose::new([1.0; 6]), Pose::zero());
/// assert_eq!(reader.read_output().0, Pose::new([1.0; 6]));
/// ```
#[derive(Debug, Clone)]
pub struct OutputReader {
    output: Arc<PublishedOutput>,
}

impl OutputReader {
    pub fn new(output: Arc<PublishedOutput>) -> Self {
        Self { output }
    }

    /// Latest `(mapped, raw)` pair.
    pub fn read_output(&self) -> (Pose, Pose) {
        self.output.read()
    }
}
