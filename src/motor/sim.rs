// Dry-run base: logs commands instead of moving anything

use tracing::{debug, info};

use super::{MotorError, MotorSink};
use crate::messages::Velocity;

/// Stand-in sink used when no base is connected
#[derive(Debug, Default)]
pub struct SimulatedBase {
    last: Velocity,
    commands: u64,
}

impl SimulatedBase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotorSink for SimulatedBase {
    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), MotorError> {
        if self.commands == 0 || self.last != Velocity::new(linear, angular) {
            debug!("[Simulated] linear={:+.2} angular={:+.2}", linear, angular);
        }
        self.last = Velocity::new(linear, angular);
        self.commands += 1;
        Ok(())
    }
}

impl Drop for SimulatedBase {
    fn drop(&mut self) {
        info!(
            "[Simulated] base released after {} commands, last linear={:+.2} angular={:+.2}",
            self.commands, self.last.linear, self.last.angular
        );
    }
}
