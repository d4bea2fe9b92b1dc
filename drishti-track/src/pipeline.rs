//! Per-cycle pose computation.
//!
//! [`TrackingPipeline`] owns everything the producer thread mutates: the
//! collaborators, the accumulated raw sample, the centering baseline and the
//! last known-good output. Nothing in here is shared; the tracker moves the
//! pipeline into its thread and drives it one cycle at a time.
//!
//! Cycle outline:
//!
//! ```text
//! fetch ─► NaN elision ─► axis remap ─┬─► gate(Ingest) ─► raw
//!                                     └─► camera rotation ─► centering
//!          ─► relative pose ─► gate(Transform) ─► filter ─► curves
//!          ─► compensation, offsets, inversion ─► gate(Mapping) ─► send
//! ```

use std::time::{Duration, Instant};

use drishti_math::{Mat3, Vec3, euler_vec_to_rmat, rmat_to_euler};

use crate::config::TrackerSettings;
use crate::drivers::{PoseFilter, Protocol, SampleSource};
use crate::gate::{Checkpoint, Finite, ValidityGate};
use crate::mapping::MappingTable;
use crate::pose::{AXIS_COUNT, Pose};
use crate::transform::{camera_rotation, relative_rotation, t_compensate};

/// Minimum spacing between protocol failure warnings.
const SEND_WARN_INTERVAL: Duration = Duration::from_secs(1);

/// External collaborators driven by the pipeline.
pub struct Collaborators {
    pub source: Box<dyn SampleSource>,
    pub filter: Option<Box<dyn PoseFilter>>,
    pub protocol: Box<dyn Protocol>,
    pub mappings: MappingTable,
}

impl Collaborators {
    /// No filter, identity curves.
    pub fn new(source: Box<dyn SampleSource>, protocol: Box<dyn Protocol>) -> Self {
        Self {
            source,
            filter: None,
            protocol,
            mappings: MappingTable::identity(),
        }
    }

    pub fn with_filter(mut self, filter: Box<dyn PoseFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_mappings(mut self, mappings: MappingTable) -> Self {
        self.mappings = mappings;
        self
    }
}

/// Pose treated as zero since the last centering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub rotation: Mat3,
    pub translation: Vec3,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            rotation: Mat3::identity(),
            translation: Vec3::zeros(),
        }
    }
}

/// Last output that passed the gate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LastValid {
    pub mapped: Pose,
    pub raw: Pose,
}

/// Control flags sampled by the tracker at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleFlags {
    /// Accept fresh samples; when false the accumulated sample is frozen.
    pub enabled: bool,
    /// Force every output axis to 0.
    pub zero: bool,
    /// A centering request is waiting.
    pub center_pending: bool,
}

impl Default for CycleFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            zero: false,
            center_pending: false,
        }
    }
}

/// Result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput {
    pub mapped: Pose,
    pub raw: Pose,
    /// The pending centering request was honored this cycle.
    pub centered: bool,
}

/// Producer-confined tracking state.
pub struct TrackingPipeline {
    collaborators: Collaborators,
    sample: [f64; AXIS_COUNT],
    baseline: Baseline,
    last: LastValid,
    gate: ValidityGate,
    send_failures: u64,
    last_send_warn: Option<Instant>,
}

impl TrackingPipeline {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            sample: [0.0; AXIS_COUNT],
            baseline: Baseline::default(),
            last: LastValid::default(),
            gate: ValidityGate::new(),
            send_failures: 0,
            last_send_warn: None,
        }
    }

    /// Fetch one sample and run a full cycle on it.
    pub fn run_cycle(&mut self, settings: &TrackerSettings, flags: CycleFlags) -> CycleOutput {
        let fresh = self.collaborators.source.fetch();
        if flags.enabled {
            self.ingest(&fresh);
        }
        let sample = self.sample;
        self.process(&sample, settings, flags)
    }

    /// Fold a fresh reading into the accumulated sample.
    ///
    /// Non-finite components keep the previous value (or 0 if that is not
    /// finite either).
    pub fn ingest(&mut self, fresh: &[f64; AXIS_COUNT]) {
        for (acc, &value) in self.sample.iter_mut().zip(fresh) {
            *acc = if value.is_finite() {
                value
            } else if acc.is_finite() {
                *acc
            } else {
                0.0
            };
        }
    }

    /// Run the transform, mapping and output stages on an accumulated
    /// sample, forward the result and update the last-valid cache.
    pub fn process(
        &mut self,
        sample: &[f64; AXIS_COUNT],
        settings: &TrackerSettings,
        flags: CycleFlags,
    ) -> CycleOutput {
        let (raw, value) = Self::remap(sample, settings);
        let raw = self.gate.admit(Checkpoint::Ingest, raw, self.last.raw);

        let cam = camera_rotation(&settings.camera);
        let r = cam * euler_vec_to_rmat(&value.rotation());
        let t = value.translation();

        let centered = flags.center_pending && self.try_center(sample, &r, &t);

        let relative = self.relative_pose(settings, &cam, &r, &t);

        let mapped = if self.gate.check(Checkpoint::Transform, &relative) {
            let mapped = self.map_pose(settings, relative, flags.zero);
            self.gate.check(Checkpoint::Mapping, &mapped).then_some(mapped)
        } else {
            None
        };

        let mapped = match mapped {
            Some(pose) => pose,
            None => {
                let fallback = self.last.mapped;
                self.refresh_curves(settings, &fallback);
                fallback
            }
        };

        self.send(&mapped);
        self.last = LastValid { mapped, raw };

        CycleOutput {
            mapped,
            raw,
            centered,
        }
    }

    /// Send the neutral pose and release all curves.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.collaborators.protocol.send(&Pose::zero()) {
            log::warn!("Pipeline: Failed to send neutral pose on shutdown: {}", e);
        }
        self.collaborators.mappings.deactivate_all();
    }

    /// Accumulated raw sample.
    pub fn sample(&self) -> &[f64; AXIS_COUNT] {
        &self.sample
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn last_valid(&self) -> &LastValid {
        &self.last
    }

    pub fn gate(&self) -> &ValidityGate {
        &self.gate
    }

    /// Protocol sends that returned an error.
    pub fn send_failures(&self) -> u64 {
        self.send_failures
    }

    /// `raw` is the accumulated sample as is; `value` follows each output
    /// axis's source index, unmapped axes read 0.
    fn remap(sample: &[f64; AXIS_COUNT], settings: &TrackerSettings) -> (Pose, Pose) {
        let raw = Pose::new(*sample);
        let value = Pose::new(std::array::from_fn(|i| {
            settings.axes[i].source_index().map_or(0.0, |k| sample[k])
        }));
        (raw, value)
    }

    fn try_center(&mut self, sample: &[f64; AXIS_COUNT], r: &Mat3, t: &Vec3) -> bool {
        if !sample.iter().any(|&v| v != 0.0) {
            return false;
        }
        if !(*r, *t).is_finite() {
            return false;
        }

        if let Some(filter) = self.collaborators.filter.as_mut() {
            filter.center();
        }
        self.baseline = Baseline {
            rotation: *r,
            translation: *t,
        };
        log::info!(
            "Pipeline: Centered at x={:.2} y={:.2} z={:.2}",
            t.x(),
            t.y(),
            t.z()
        );
        true
    }

    /// Translation and rotation relative to the baseline, in camera-corrected
    /// axes.
    fn relative_pose(&self, settings: &TrackerSettings, cam: &Mat3, r: &Mat3, t: &Vec3) -> Pose {
        let offset = *t - self.baseline.translation;
        let translation = t_compensate(&cam.transpose(), &offset, false);

        let m = relative_rotation(r, &self.baseline.rotation, settings.center_method);
        let rotation = rmat_to_euler(&m).map(f64::to_degrees);

        Pose::from_parts(&translation, &rotation)
    }

    fn map_pose(&mut self, settings: &TrackerSettings, pose: Pose, zero: bool) -> Pose {
        let mut value = match self.collaborators.filter.as_mut() {
            Some(filter) => filter.filter(&pose),
            None => pose,
        };

        for (i, options) in settings.axes.iter().enumerate() {
            value[i] = self.collaborators.mappings.map(i, value[i], options);
        }

        if settings.time_compensation {
            let r = euler_vec_to_rmat(&value.rotation());
            let t = t_compensate(&r, &value.translation(), settings.lock_z);
            value.set_translation(&t);
        }

        for (i, options) in settings.axes.iter().enumerate() {
            value[i] = options.apply_offset(value[i]);
        }

        if zero { Pose::zero() } else { value }
    }

    /// Re-select curves for a fallback pose so their activity flags track
    /// what is actually being output. The mapped values are discarded.
    fn refresh_curves(&self, settings: &TrackerSettings, pose: &Pose) {
        for (i, options) in settings.axes.iter().enumerate() {
            self.collaborators.mappings.map(i, pose[i], options);
        }
    }

    fn send(&mut self, pose: &Pose) {
        if let Err(e) = self.collaborators.protocol.send(pose) {
            self.send_failures += 1;
            let due = self
                .last_send_warn
                .is_none_or(|last| last.elapsed() >= SEND_WARN_INTERVAL);
            if due {
                log::warn!(
                    "Pipeline: Protocol send failed ({} failures): {}",
                    self.send_failures,
                    e
                );
                self.last_send_warn = Some(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraOffsets, CenterMethod};
    use crate::drivers::{Curve, IdentityCurve};
    use crate::error::{Error, Result};
    use crate::mapping::AxisCurves;
    use crate::pose::Axis;
    use approx::assert_abs_diff_eq;
    use drishti_math::euler_to_rmat;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays queued samples, then repeats the last one.
    struct Script {
        queue: VecDeque<[f64; 6]>,
        last: [f64; 6],
    }

    impl Script {
        fn new(samples: &[[f64; 6]]) -> Self {
            Self {
                queue: samples.iter().copied().collect(),
                last: [0.0; 6],
            }
        }
    }

    impl SampleSource for Script {
        fn fetch(&mut self) -> [f64; 6] {
            if let Some(next) = self.queue.pop_front() {
                self.last = next;
            }
            self.last
        }
    }

    #[derive(Clone, Default)]
    struct Sink {
        sent: Arc<Mutex<Vec<Pose>>>,
        fail: bool,
    }

    impl Protocol for Sink {
        fn send(&mut self, pose: &Pose) -> Result<()> {
            self.sent.lock().push(*pose);
            if self.fail {
                Err(Error::Protocol("consumer gone".into()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Clone, Default)]
    struct CountingFilter {
        centers: Arc<AtomicUsize>,
    }

    impl PoseFilter for CountingFilter {
        fn center(&mut self) {
            self.centers.fetch_add(1, Ordering::SeqCst);
        }

        fn filter(&mut self, input: &Pose) -> Pose {
            *input
        }
    }

    /// Returns NaN for inputs above a threshold.
    struct Poisoned {
        above: f64,
        state: IdentityCurve,
    }

    impl Curve for Poisoned {
        fn set_active(&self, active: bool) {
            self.state.set_active(active);
        }

        fn evaluate(&self, x: f64) -> f64 {
            if x > self.above { f64::NAN } else { x }
        }
    }

    fn pipeline(samples: &[[f64; 6]]) -> (TrackingPipeline, Sink) {
        let sink = Sink::default();
        let collaborators = Collaborators::new(Box::new(Script::new(samples)), Box::new(sink.clone()));
        (TrackingPipeline::new(collaborators), sink)
    }

    fn no_startup_center() -> TrackerSettings {
        TrackerSettings {
            center_at_startup: false,
            ..TrackerSettings::default()
        }
    }

    fn center() -> CycleFlags {
        CycleFlags {
            center_pending: true,
            ..CycleFlags::default()
        }
    }

    #[test]
    fn test_zero_samples_stay_zero() {
        let (mut p, sink) = pipeline(&[[0.0; 6]; 3]);
        let settings = no_startup_center();
        for _ in 0..3 {
            let out = p.run_cycle(&settings, CycleFlags::default());
            assert_eq!(out.mapped, Pose::zero());
            assert_eq!(out.raw, Pose::zero());
        }
        assert_eq!(sink.sent.lock().len(), 3);
    }

    #[test]
    fn test_uncentered_pose_passes_through() {
        let sample = [1.0, -2.0, 30.0, 10.0, -5.0, 3.0];
        let (mut p, _) = pipeline(&[sample]);
        let out = p.run_cycle(&no_startup_center(), CycleFlags::default());
        assert_abs_diff_eq!(
            out.mapped.to_array().as_slice(),
            sample.as_slice(),
            epsilon = 1e-9
        );
        assert_eq!(out.raw, Pose::new(sample));
    }

    #[test]
    fn test_nan_axis_keeps_previous_value() {
        let first = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut second = [7.0; 6];
        second[Axis::Pitch.index()] = f64::NAN;
        let (mut p, _) = pipeline(&[first, second]);
        let settings = no_startup_center();

        p.run_cycle(&settings, CycleFlags::default());
        let out = p.run_cycle(&settings, CycleFlags::default());
        assert_eq!(out.raw.to_array(), [7.0, 7.0, 7.0, 7.0, 5.0, 7.0]);
    }

    #[test]
    fn test_nan_before_any_reading_becomes_zero() {
        let mut sample = [1.0; 6];
        sample[0] = f64::INFINITY;
        let (mut p, _) = pipeline(&[sample]);
        let out = p.run_cycle(&no_startup_center(), CycleFlags::default());
        assert_eq!(out.raw[0], 0.0);
        assert!(out.mapped.is_finite());
    }

    #[test]
    fn test_non_finite_sample_falls_back_to_previous_output() {
        let (mut p, sink) = pipeline(&[]);
        let settings = no_startup_center();

        let good = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let first = p.process(&good, &settings, CycleFlags::default());

        let mut bad = [9.0; 6];
        bad[Axis::Yaw.index()] = f64::NAN;
        let second = p.process(&bad, &settings, CycleFlags::default());

        assert_eq!(second.raw, first.raw);
        assert_eq!(second.mapped, first.mapped);
        assert_eq!(p.last_valid().raw, first.raw);
        assert_eq!(p.last_valid().mapped, first.mapped);
        assert_eq!(p.gate().rejected(Checkpoint::Ingest), 1);
        assert_eq!(p.gate().rejected(Checkpoint::Transform), 1);
        // The fallback is still forwarded.
        assert_eq!(sink.sent.lock().last(), Some(&first.mapped));
    }

    #[test]
    fn test_unmapped_nan_axis_only_affects_raw() {
        let (mut p, _) = pipeline(&[]);
        let mut settings = no_startup_center();
        settings.axes[Axis::Roll.index()].source = None;

        let first = p.process(&[0.0, 0.0, 0.0, 10.0, 0.0, 0.0], &settings, CycleFlags::default());
        let second = p.process(&[0.0, 0.0, 0.0, 20.0, 0.0, f64::NAN], &settings, CycleFlags::default());

        assert_eq!(second.raw, first.raw);
        assert_abs_diff_eq!(second.mapped[Axis::Yaw], 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nan_at_mapping_falls_back_and_refreshes_curves() {
        let primaries: Vec<Arc<Poisoned>> = (0..AXIS_COUNT)
            .map(|_| {
                Arc::new(Poisoned {
                    above: 50.0,
                    state: IdentityCurve::new(),
                })
            })
            .collect();
        let alternates: Vec<Arc<IdentityCurve>> =
            (0..AXIS_COUNT).map(|_| Arc::new(IdentityCurve::new())).collect();
        let table = MappingTable::new(std::array::from_fn(|i| {
            AxisCurves::new(primaries[i].clone(), alternates[i].clone())
        }));

        let sink = Sink::default();
        let collaborators = Collaborators::new(
            Box::new(Script::new(&[[0.0, 0.0, 0.0, 20.0, 0.0, 0.0], [0.0, 0.0, 0.0, 60.0, 0.0, 0.0]])),
            Box::new(sink.clone()),
        )
        .with_mappings(table);
        let mut p = TrackingPipeline::new(collaborators);

        let mut settings = no_startup_center();
        settings.axes[Axis::Yaw.index()].alt = true;

        let first = p.run_cycle(&settings, CycleFlags::default());
        assert!(first.mapped.is_finite());

        // Force the fallback to select the alternate curve on yaw.
        p.last.mapped[Axis::Yaw] = -5.0;
        let expected = p.last.mapped;
        let second = p.run_cycle(&settings, CycleFlags::default());

        assert_eq!(second.mapped, expected);
        assert_eq!(p.gate().rejected(Checkpoint::Mapping), 1);
        assert!(alternates[Axis::Yaw.index()].is_active());
        assert!(!primaries[Axis::Yaw.index()].state.is_active());
        assert_eq!(*sink.sent.lock().last().unwrap(), expected);
    }

    #[test]
    fn test_centering_sets_baseline_and_zeroes_output() {
        let sample = [2.0, -1.0, 40.0, 25.0, -12.0, 6.0];
        let (mut p, _) = pipeline(&[sample]);
        let settings = TrackerSettings {
            camera: CameraOffsets {
                yaw: 5.0,
                pitch: -10.0,
                roll: 0.0,
            },
            ..no_startup_center()
        };

        let out = p.run_cycle(&settings, center());
        assert!(out.centered);

        let cam = camera_rotation(&settings.camera);
        let r = cam * euler_to_rmat(25.0, -12.0, 6.0);
        assert_abs_diff_eq!(p.baseline().rotation, r, epsilon = 1e-12);
        assert_abs_diff_eq!(p.baseline().translation, Vec3::from_xyz(2.0, -1.0, 40.0), epsilon = 1e-12);
        assert_abs_diff_eq!(out.mapped.to_array().as_slice(), [0.0; 6].as_slice(), epsilon = 1e-9);
    }

    #[test]
    fn test_centered_motion_is_relative() {
        let (mut p, _) = pipeline(&[[0.0, 0.0, 50.0, 20.0, 0.0, 0.0], [3.0, 0.0, 50.0, 35.0, 0.0, 0.0]]);
        let settings = no_startup_center();

        p.run_cycle(&settings, center());
        let out = p.run_cycle(&settings, CycleFlags::default());

        assert_abs_diff_eq!(out.mapped[Axis::Yaw], 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.mapped[Axis::TX], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.mapped[Axis::TZ], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_sample_does_not_center() {
        let filter = CountingFilter::default();
        let sink = Sink::default();
        let collaborators = Collaborators::new(
            Box::new(Script::new(&[[0.0; 6], [0.0, 0.0, 10.0, 0.0, 0.0, 0.0]])),
            Box::new(sink),
        )
        .with_filter(Box::new(filter.clone()));
        let mut p = TrackingPipeline::new(collaborators);
        let settings = no_startup_center();

        let out = p.run_cycle(&settings, center());
        assert!(!out.centered);
        assert_eq!(*p.baseline(), Baseline::default());
        assert_eq!(filter.centers.load(Ordering::SeqCst), 0);

        let out = p.run_cycle(&settings, center());
        assert!(out.centered);
        assert_eq!(filter.centers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_finite_pose_does_not_center() {
        let (mut p, _) = pipeline(&[]);
        let settings = no_startup_center();
        let out = p.process(&[0.0, 0.0, 1.0, f64::NAN, 0.0, 0.0], &settings, center());
        assert!(!out.centered);
        assert_eq!(*p.baseline(), Baseline::default());
        // Only the post-transform checkpoint counts the bad rotation.
        assert_eq!(p.gate().rejected(Checkpoint::Transform), 1);
        assert_eq!(p.gate().rejected(Checkpoint::Ingest), 1);
        assert_eq!(p.gate().total_rejected(), 2);
    }

    #[test]
    fn test_camera_method_changes_compound_rotation() {
        let samples = [[0.0, 0.0, 0.0, 40.0, 0.0, 0.0], [0.0, 0.0, 0.0, 40.0, 25.0, 0.0]];
        let mut head = no_startup_center();
        head.center_method = CenterMethod::Head;
        let camera = TrackerSettings {
            center_method: CenterMethod::Camera,
            ..head.clone()
        };

        let (mut a, _) = pipeline(&samples);
        a.run_cycle(&head, center());
        let head_out = a.run_cycle(&head, CycleFlags::default());

        let (mut b, _) = pipeline(&samples);
        b.run_cycle(&camera, center());
        let camera_out = b.run_cycle(&camera, CycleFlags::default());

        assert_abs_diff_eq!(head_out.mapped[Axis::Pitch], 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(head_out.mapped[Axis::Yaw], 0.0, epsilon = 1e-9);
        let differs = camera_out
            .mapped
            .iter()
            .zip(head_out.mapped.iter())
            .any(|(a, b)| (a - b).abs() > 1e-3);
        assert!(differs);
    }

    #[test]
    fn test_offset_then_inversion() {
        let (mut p, _) = pipeline(&[[0.0, 0.0, 0.0, 10.0, 0.0, 0.0]]);
        let mut settings = no_startup_center();
        settings.axes[Axis::Yaw.index()].zero = 5.0;
        settings.axes[Axis::Yaw.index()].invert = true;

        let out = p.run_cycle(&settings, CycleFlags::default());
        assert_abs_diff_eq!(out.mapped[Axis::Yaw], -15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_source_remap_and_unmapped_axis() {
        let (mut p, _) = pipeline(&[[0.0, 0.0, 0.0, 10.0, 20.0, 0.0]]);
        let mut settings = no_startup_center();
        settings.axes[Axis::Yaw.index()].source = Some(Axis::Pitch.index());
        settings.axes[Axis::Pitch.index()].source = None;

        let out = p.run_cycle(&settings, CycleFlags::default());
        assert_abs_diff_eq!(out.mapped[Axis::Yaw], 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.mapped[Axis::Pitch], 0.0, epsilon = 1e-9);
        // Raw is never remapped.
        assert_eq!(out.raw[Axis::Yaw], 10.0);
    }

    #[test]
    fn test_time_compensation_rotates_translation() {
        let (mut p, _) = pipeline(&[[0.0, 0.0, 10.0, 0.0, 30.0, 0.0]]);
        let settings = TrackerSettings {
            time_compensation: true,
            ..no_startup_center()
        };
        let out = p.run_cycle(&settings, CycleFlags::default());

        let expected = t_compensate(&euler_to_rmat(0.0, 30.0, 0.0), &Vec3::from_xyz(0.0, 0.0, 10.0), false);
        assert_abs_diff_eq!(out.mapped.translation(), expected, epsilon = 1e-9);

        let locked = TrackerSettings {
            lock_z: true,
            ..settings
        };
        let out = p.run_cycle(&locked, CycleFlags::default());
        assert_abs_diff_eq!(out.mapped[Axis::TZ], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disabled_tracking_freezes_sample() {
        let (mut p, _) = pipeline(&[[1.0; 6], [2.0; 6], [3.0; 6]]);
        let settings = no_startup_center();
        let disabled = CycleFlags {
            enabled: false,
            ..CycleFlags::default()
        };

        p.run_cycle(&settings, CycleFlags::default());
        let out = p.run_cycle(&settings, disabled);
        assert_eq!(out.raw.to_array(), [1.0; 6]);
        assert_eq!(p.sample(), &[1.0; 6]);

        let out = p.run_cycle(&settings, CycleFlags::default());
        assert_eq!(out.raw.to_array(), [3.0; 6]);
    }

    #[test]
    fn test_zero_flag_forces_neutral_output() {
        let (mut p, _) = pipeline(&[[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);
        let mut settings = no_startup_center();
        settings.axes[Axis::TX.index()].zero = 100.0;
        let flags = CycleFlags {
            zero: true,
            ..CycleFlags::default()
        };
        let out = p.run_cycle(&settings, flags);
        assert_eq!(out.mapped, Pose::zero());
        assert_eq!(out.raw.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_protocol_failure_is_counted() {
        let sink = Sink {
            fail: true,
            ..Sink::default()
        };
        let collaborators = Collaborators::new(Box::new(Script::new(&[[1.0; 6]])), Box::new(sink.clone()));
        let mut p = TrackingPipeline::new(collaborators);
        let settings = no_startup_center();

        let first = p.run_cycle(&settings, CycleFlags::default());
        let second = p.run_cycle(&settings, CycleFlags::default());
        assert_eq!(p.send_failures(), 2);
        assert_eq!(second.mapped, first.mapped);
        assert_eq!(sink.sent.lock().len(), 2);
    }

    #[test]
    fn test_shutdown_sends_neutral_pose_and_releases_curves() {
        let curves: Vec<Arc<IdentityCurve>> =
            (0..2 * AXIS_COUNT).map(|_| Arc::new(IdentityCurve::new())).collect();
        let table = MappingTable::new(std::array::from_fn(|i| {
            AxisCurves::new(curves[2 * i].clone(), curves[2 * i + 1].clone())
        }));
        let sink = Sink::default();
        let collaborators = Collaborators::new(Box::new(Script::new(&[[1.0; 6]])), Box::new(sink.clone()))
            .with_mappings(table);
        let mut p = TrackingPipeline::new(collaborators);

        p.run_cycle(&no_startup_center(), CycleFlags::default());
        assert!(curves.iter().any(|c| c.is_active()));

        p.shutdown();
        assert_eq!(*sink.sent.lock().last().unwrap(), Pose::zero());
        assert_eq!(sink.sent.lock().len(), 2);
        assert!(curves.iter().all(|c| !c.is_active()));
    }
}
