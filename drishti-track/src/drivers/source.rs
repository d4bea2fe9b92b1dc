//! Raw sample source trait

/// Producer of raw 6-axis head samples.
///
/// Called once per tracking cycle from the tracker thread. A NaN or
/// infinite component means "no fresh reading for this axis"; the tracker
/// keeps the previous value for it.
pub trait SampleSource: Send {
    /// Latest (x, y, z, yaw, pitch, roll) reading, translation in
    /// centimeters and rotation in degrees.
    fn fetch(&mut self) -> [f64; 6];
}
