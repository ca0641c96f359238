// Command-line flags layered over the compiled-in defaults

use std::time::Duration;

use clap::Parser;

use crate::config::{
    DriveLimits, TeleopConfig, ANGULAR_ACCEL, BASE_BAUDRATE, BASE_PORT, KEY_TIMEOUT,
    LINEAR_ACCEL, MAX_SPEED, MAX_STEER, MIN_TURN_SPEED, TICK_RATE_HZ,
};
use crate::motor::CommandProtocol;

/// Drive the rover from the keyboard: hold WASD to move, Space to stop, Q to quit
#[derive(Debug, Parser)]
#[command(name = "rover-teleop", version, about)]
pub struct Args {
    /// Serial port of the rover base controller
    #[arg(long, default_value = BASE_PORT)]
    pub port: String,

    /// Serial baud rate
    #[arg(long, default_value_t = BASE_BAUDRATE)]
    pub baud: u32,

    /// Command frames sent to the base
    #[arg(long, value_enum, default_value_t = CommandProtocol::Velocity)]
    pub protocol: CommandProtocol,

    /// Log commands instead of opening the serial port
    #[arg(long)]
    pub dry_run: bool,

    /// Do not draw the status line
    #[arg(long)]
    pub quiet: bool,

    /// Top linear speed (m/s)
    #[arg(long, default_value_t = MAX_SPEED)]
    pub max_speed: f64,

    /// Linear speed applied instantly while turning (m/s)
    #[arg(long, default_value_t = MIN_TURN_SPEED)]
    pub min_turn_speed: f64,

    /// Top angular speed (rad/s)
    #[arg(long, default_value_t = MAX_STEER)]
    pub max_steer: f64,

    /// Linear speed change per tick
    #[arg(long, default_value_t = LINEAR_ACCEL)]
    pub linear_accel: f64,

    /// Angular speed change per tick
    #[arg(long, default_value_t = ANGULAR_ACCEL)]
    pub angular_accel: f64,

    /// Control loop rate
    #[arg(long, default_value_t = TICK_RATE_HZ)]
    pub tick_rate_hz: u64,

    /// Release a key after this long without a repeat (ms)
    #[arg(long, default_value_t = KEY_TIMEOUT.as_millis() as u64)]
    pub key_timeout_ms: u64,
}

impl Args {
    pub fn into_config(self) -> TeleopConfig {
        TeleopConfig {
            limits: DriveLimits {
                max_speed: self.max_speed,
                min_turn_speed: self.min_turn_speed,
                max_steer: self.max_steer,
                linear_accel: self.linear_accel,
                angular_accel: self.angular_accel,
            },
            tick_rate_hz: self.tick_rate_hz,
            key_timeout: Duration::from_millis(self.key_timeout_ms),
            port: self.port,
            baudrate: self.baud,
            protocol: self.protocol,
            dry_run: self.dry_run,
            show_status: !self.quiet,
        }
    }
}
