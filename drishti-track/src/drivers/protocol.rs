//! Output protocol trait

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::pose::Pose;

/// Consumer-facing output adapter.
///
/// Receives exactly one pose per tracking cycle. An `Err` is logged by the
/// tracker and the loop carries on.
pub trait Protocol: Send {
    fn send(&mut self, pose: &Pose) -> Result<()>;
}

/// Protocol that writes the forwarded pose to the debug log.
///
/// Logging is throttled to one line per `interval`.
#[derive(Debug)]
pub struct LogProtocol {
    interval: Duration,
    last_log: Option<Instant>,
    sent: u64,
}

impl LogProtocol {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_log: None,
            sent: 0,
        }
    }

    /// Number of poses received so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Default for LogProtocol {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Protocol for LogProtocol {
    fn send(&mut self, pose: &Pose) -> Result<()> {
        self.sent += 1;
        let due = self
            .last_log
            .is_none_or(|last| last.elapsed() >= self.interval);
        if due {
            log::debug!("LogProtocol: #{} {}", self.sent, pose);
            self.last_log = Some(Instant::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_every_pose() {
        let mut protocol = LogProtocol::new(Duration::from_secs(60));
        for _ in 0..5 {
            protocol.send(&Pose::zero()).unwrap();
        }
        assert_eq!(protocol.sent(), 5);
    }
}
