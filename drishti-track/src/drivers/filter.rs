//! Pose filter trait

use crate::pose::Pose;

/// Smoothing/prediction stage applied to the centered pose.
pub trait PoseFilter: Send {
    /// Reset internal state; called when a centering request is honored.
    fn center(&mut self);

    /// Filter one centered pose.
    fn filter(&mut self, input: &Pose) -> Pose;
}
