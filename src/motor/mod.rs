// Motor control for the rover base
//
// Provides:
// - The `MotorSink` seam the control loop dispatches into
// - Differential-drive kinematics (body velocity -> wheel speeds)
// - JSON line protocol for the serial base controller
// - Serial and simulated sinks

pub mod kinematics;
pub mod protocol;
mod serial;
mod sim;

pub use kinematics::{body_to_wheels, WheelSpeeds};
pub use protocol::{encode_frame, BaseFrame, CommandProtocol};
pub use serial::SerialBase;
pub use sim::SimulatedBase;

/// Error types for motor dispatch
#[derive(Debug, thiserror::Error)]
pub enum MotorError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Consumer of (linear, angular) velocity commands.
///
/// Dispatch is fire-and-forget: the return value only reports whether the
/// command left this process. Releasing the base is `Drop`.
pub trait MotorSink {
    /// * `linear` - m/s, positive = forward
    /// * `angular` - rad/s, positive = right turn
    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), MotorError>;
}

impl<S: MotorSink + ?Sized> MotorSink for Box<S> {
    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), MotorError> {
        (**self).set_velocity(linear, angular)
    }
}
