// Velocity smoothing under per-tick acceleration limits
//
// Two-speed policy: while turning, linear speed jumps straight to the turn
// minimum so steering is never held back by the ramp. Everything else moves
// by at most one acceleration step per tick.

use crate::config::{is_turning, DriveLimits, REST_EPSILON};
use crate::messages::{Target, Velocity};

/// Absorbs floating-point drift so a ramp lands exactly on its target
const SNAP_TOLERANCE: f64 = 1e-9;

/// Live and target velocity. Owned by the control loop only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityState {
    pub linear: f64,
    pub angular: f64,
    pub target_linear: f64,
    pub target_angular: f64,
}

impl VelocityState {
    /// At rest with zero targets
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> Velocity {
        Velocity::new(self.linear, self.angular)
    }

    pub fn is_at_rest(&self) -> bool {
        self.linear.abs() <= REST_EPSILON && self.angular.abs() <= REST_EPSILON
    }

    /// Aim for rest without touching the live velocity
    pub fn clear_targets(&mut self) {
        self.target_linear = 0.0;
        self.target_angular = 0.0;
    }

    /// Take this tick's target, replacing the previous one entirely.
    /// An emergency stop zeroes the live velocity without smoothing.
    pub fn apply(&mut self, target: Target, limits: &DriveLimits) {
        self.target_linear = target.velocity.linear;
        self.target_angular = target.velocity.angular;

        if target.emergency_stop {
            self.linear = 0.0;
            self.angular = 0.0;
            return;
        }

        self.smooth(limits);
    }

    /// Advance one tick toward the current targets
    pub fn smooth(&mut self, limits: &DriveLimits) {
        let turning = is_turning(self.target_angular);
        let direction = self.target_linear.signum();
        let needs_boost = turning
            && self.target_linear != 0.0
            && self.target_linear.abs() + SNAP_TOLERANCE >= limits.min_turn_speed;

        self.linear = if needs_boost && self.linear * direction < limits.min_turn_speed {
            direction * limits.min_turn_speed
        } else {
            approach(self.linear, self.target_linear, limits.linear_accel)
        };
        self.angular = approach(self.angular, self.target_angular, limits.angular_accel);

        self.linear = self.linear.clamp(-limits.max_speed, limits.max_speed);
        self.angular = self.angular.clamp(-limits.max_steer, limits.max_steer);
    }
}

/// Move `current` toward `target` by at most `step`, snapping when within one step
fn approach(current: f64, target: f64, step: f64) -> f64 {
    let gap = target - current;
    if gap.abs() <= step + SNAP_TOLERANCE {
        target
    } else {
        current + step.copysign(gap)
    }
}
