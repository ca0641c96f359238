// Differential-drive kinematics for the two-track rover base
// Converts body-frame velocities (linear, angular) to left/right wheel speeds.

/// Distance between the left and right wheels
pub const TRACK_WIDTH: f64 = 0.172; // meters

/// Maximum wheel speed the base controller accepts (safety limit)
pub const MAX_WHEEL_SPEED: f64 = 0.5; // m/s

/// Wheel speed commands in m/s
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

impl WheelSpeeds {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Convert body-frame velocities to wheel speeds
///
/// # Arguments
/// * `linear` - Forward velocity in m/s (positive = forward)
/// * `angular` - Rotational velocity in rad/s (positive = right turn)
pub fn body_to_wheels(linear: f64, angular: f64) -> WheelSpeeds {
    body_to_wheels_with_params(linear, angular, TRACK_WIDTH, MAX_WHEEL_SPEED)
}

/// Convert body-frame velocities to wheel speeds with custom parameters
pub fn body_to_wheels_with_params(
    linear: f64,
    angular: f64,
    track_width: f64,
    max_wheel_speed: f64,
) -> WheelSpeeds {
    // Turning right speeds up the left side
    let offset = angular * track_width / 2.0;
    let mut left = linear + offset;
    let mut right = linear - offset;

    // Scale both wheels down together so the turn radius is preserved
    let fastest = left.abs().max(right.abs());
    if fastest > max_wheel_speed {
        let scale = max_wheel_speed / fastest;
        left *= scale;
        right *= scale;
    }

    WheelSpeeds { left, right }
}
