// Drive limits, timing, serial defaults
use std::time::Duration;

use crate::error::ConfigError;

// Speed limits
pub const MAX_SPEED: f64 = 0.5; // m/s
pub const MIN_TURN_SPEED: f64 = 0.5; // m/s, applied instantly while turning
pub const MAX_STEER: f64 = 0.2; // rad/s

// Per-tick acceleration (20Hz -> 0.4 m/s per second linear)
pub const LINEAR_ACCEL: f64 = 0.02;
pub const ANGULAR_ACCEL: f64 = 0.05;

// Control loop frequency. Above the cap the period drops under 1 ms.
pub const TICK_RATE_HZ: u64 = 20;
pub const MAX_TICK_RATE_HZ: u64 = 1000;

// Longest allowed full-scale ramp, in ticks. Bounds the shutdown ramp.
pub const MAX_RAMP_TICKS: f64 = 10_000.0;

// Keys expire after this long without a repeat
pub const KEY_TIMEOUT: Duration = Duration::from_millis(150);

// Input thread poll timeout, bounds how long it takes to notice a stop
pub const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(10);

// Below these magnitudes a value counts as zero
pub const TURN_EPSILON: f64 = 0.01;
pub const REST_EPSILON: f64 = 0.01;

/// Whether an angular velocity counts as a turn
pub fn is_turning(angular: f64) -> bool {
    angular.abs() > TURN_EPSILON
}

// Serial port for the rover base controller
pub const BASE_PORT: &str = "/dev/ttyUSB1";
pub const BASE_BAUDRATE: u32 = 115_200;

/// Motion limits shared by the resolver and the smoother.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveLimits {
    pub max_speed: f64,
    pub min_turn_speed: f64,
    pub max_steer: f64,
    pub linear_accel: f64,
    pub angular_accel: f64,
}

impl Default for DriveLimits {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            min_turn_speed: MIN_TURN_SPEED,
            max_steer: MAX_STEER,
            linear_accel: LINEAR_ACCEL,
            angular_accel: ANGULAR_ACCEL,
        }
    }
}

impl DriveLimits {
    /// Reject limits the smoother cannot honor.
    ///
    /// `min_turn_speed` must not exceed `max_speed`, otherwise a turn would
    /// push linear speed past the speed cap. `max_steer` must clear the turn
    /// threshold so a steering key always triggers the turn boost, and each
    /// full-scale ramp must finish within [`MAX_RAMP_TICKS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("max_speed", self.max_speed),
            ("min_turn_speed", self.min_turn_speed),
            ("max_steer", self.max_steer),
            ("linear_accel", self.linear_accel),
            ("angular_accel", self.angular_accel),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.min_turn_speed > self.max_speed {
            return Err(ConfigError::TurnSpeedAboveMax {
                min_turn_speed: self.min_turn_speed,
                max_speed: self.max_speed,
            });
        }

        if !is_turning(self.max_steer) {
            return Err(ConfigError::SteerBelowTurnThreshold {
                max_steer: self.max_steer,
                threshold: TURN_EPSILON,
            });
        }

        let ramps = [
            ("linear_accel", self.max_speed / self.linear_accel),
            ("angular_accel", self.max_steer / self.angular_accel),
        ];
        for (name, ticks) in ramps {
            if ticks > MAX_RAMP_TICKS {
                return Err(ConfigError::RampTooSlow { name, ticks });
            }
        }

        Ok(())
    }
}

/// Everything the runtime needs, fixed once startup completes.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleopConfig {
    pub limits: DriveLimits,
    pub tick_rate_hz: u64,
    pub key_timeout: Duration,
    pub port: String,
    pub baudrate: u32,
    pub protocol: crate::motor::CommandProtocol,
    pub dry_run: bool,
    pub show_status: bool,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            limits: DriveLimits::default(),
            tick_rate_hz: TICK_RATE_HZ,
            key_timeout: KEY_TIMEOUT,
            port: BASE_PORT.to_string(),
            baudrate: BASE_BAUDRATE,
            protocol: crate::motor::CommandProtocol::default(),
            dry_run: false,
            show_status: true,
        }
    }
}

impl TeleopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(ConfigError::TickRateTooHigh {
                hz: self.tick_rate_hz,
                max: MAX_TICK_RATE_HZ,
            });
        }
        if self.key_timeout.is_zero() {
            return Err(ConfigError::ZeroKeyTimeout);
        }
        self.limits.validate()
    }

    /// Control period. Never zero for a rate that passed `validate`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate_hz.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(TeleopConfig::default().validate().is_ok());
        assert_eq!(TeleopConfig::default().tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_turn_speed_above_max_rejected() {
        let limits = DriveLimits {
            min_turn_speed: 0.6,
            ..DriveLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(ConfigError::TurnSpeedAboveMax { .. })
        ));
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        let limits = DriveLimits {
            linear_accel: 0.0,
            ..DriveLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(ConfigError::NonPositive { name: "linear_accel", .. })
        ));

        let limits = DriveLimits {
            max_steer: f64::NAN,
            ..DriveLimits::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let config = TeleopConfig {
            tick_rate_hz: 0,
            ..TeleopConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTickRate)));
    }

    #[test]
    fn test_tick_rate_above_cap_rejected() {
        let config = TeleopConfig {
            tick_rate_hz: 2000,
            ..TeleopConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TickRateTooHigh { hz: 2000, .. })
        ));

        let at_cap = TeleopConfig {
            tick_rate_hz: MAX_TICK_RATE_HZ,
            ..TeleopConfig::default()
        };
        assert!(at_cap.validate().is_ok());
        assert_eq!(at_cap.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_tick_interval_keeps_sub_millisecond_precision() {
        let config = TeleopConfig {
            tick_rate_hz: 3,
            ..TeleopConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_nanos(333_333_333));

        let config = TeleopConfig {
            tick_rate_hz: 7,
            ..TeleopConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_nanos(142_857_142));
    }

    #[test]
    fn test_steer_below_turn_threshold_rejected() {
        let limits = DriveLimits {
            max_steer: 0.005,
            ..DriveLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(ConfigError::SteerBelowTurnThreshold { .. })
        ));

        let limits = DriveLimits {
            max_steer: TURN_EPSILON,
            ..DriveLimits::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_negligible_accel_rejected() {
        let limits = DriveLimits {
            linear_accel: 1e-20,
            ..DriveLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(ConfigError::RampTooSlow { name: "linear_accel", .. })
        ));

        let limits = DriveLimits {
            angular_accel: 1e-9,
            ..DriveLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(ConfigError::RampTooSlow { name: "angular_accel", .. })
        ));
    }
}
