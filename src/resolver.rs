// Maps the held keys to a target velocity
//
// Precedence: stop > forward > backward for linear, left > right for angular.
// Left steers negative. A turn always carries at least MIN_TURN_SPEED of
// linear bias so the drivetrain has the authority to execute it.

use crate::config::{is_turning, DriveLimits};
use crate::keys::KeySet;
use crate::messages::{DriveKey, Target, Velocity};

/// Longitudinal intent from the forward/backward keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Longitudinal {
    Forward,
    Backward,
    Hold,
}

/// Resolve the target for one tick. Pure function of the key set and limits.
pub fn resolve_target(keys: &KeySet, limits: &DriveLimits) -> Target {
    if keys.contains(&DriveKey::Stop) {
        return Target {
            velocity: Velocity::zero(),
            emergency_stop: true,
        };
    }

    let longitudinal = if keys.contains(&DriveKey::Forward) {
        Longitudinal::Forward
    } else if keys.contains(&DriveKey::Backward) {
        Longitudinal::Backward
    } else {
        Longitudinal::Hold
    };

    let mut linear = match longitudinal {
        Longitudinal::Forward => limits.max_speed,
        Longitudinal::Backward => -limits.max_speed,
        Longitudinal::Hold => 0.0,
    };

    let angular = if keys.contains(&DriveKey::Left) {
        -limits.max_steer
    } else if keys.contains(&DriveKey::Right) {
        limits.max_steer
    } else {
        0.0
    };

    if is_turning(angular) {
        linear = match longitudinal {
            // turning in place still needs forward bias
            Longitudinal::Forward | Longitudinal::Hold => limits.min_turn_speed,
            Longitudinal::Backward => -limits.min_turn_speed,
        };
    }

    Target {
        velocity: Velocity::new(linear, angular),
        emergency_stop: false,
    }
}
