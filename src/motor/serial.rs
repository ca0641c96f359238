// Serial-attached rover base
//
// Writes one JSON frame per command. The controller does not acknowledge
// frames, so a successful write is all a dispatch can report.

use serialport::SerialPort;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::protocol::{encode_frame, BaseFrame, CommandProtocol};
use super::{MotorError, MotorSink};

/// Write timeout, kept well under one control tick
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(20);

/// Rover base on a serial port
pub struct SerialBase<W: Write = Box<dyn SerialPort>> {
    port: W,
    protocol: CommandProtocol,
    // last frame that reached the port was a zero command
    stopped: bool,
}

impl SerialBase {
    /// Open the base controller. Fails if the port cannot be acquired.
    pub fn open(
        port_name: &str,
        baudrate: u32,
        protocol: CommandProtocol,
    ) -> Result<Self, MotorError> {
        info!(
            "Opening rover base on {} at {} baud ({:?} frames)",
            port_name, baudrate, protocol
        );
        let port = serialport::new(port_name, baudrate)
            .timeout(WRITE_TIMEOUT)
            .open()?;

        Ok(Self::with_writer(port, protocol))
    }
}

impl<W: Write> SerialBase<W> {
    /// Speak the base protocol over an already-open writer
    pub fn with_writer(port: W, protocol: CommandProtocol) -> Self {
        Self {
            port,
            protocol,
            stopped: false,
        }
    }

    fn send_frame(&mut self, frame: &BaseFrame) -> Result<(), MotorError> {
        let line = encode_frame(frame)?;
        self.port.write_all(&line)?;
        self.port.flush()?;
        Ok(())
    }
}

impl<W: Write> MotorSink for SerialBase<W> {
    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), MotorError> {
        let frame = BaseFrame::for_velocity(self.protocol, linear, angular);
        debug!("Sending frame: {:?}", frame);
        self.stopped = false;
        self.send_frame(&frame)?;
        self.stopped = linear == 0.0 && angular == 0.0;
        Ok(())
    }
}

impl<W: Write> Drop for SerialBase<W> {
    fn drop(&mut self) {
        // Never leave the base with a stale non-zero command
        if !self.stopped {
            if let Err(e) = self.set_velocity(0.0, 0.0) {
                warn!("Failed to stop base on release: {}", e);
            }
        }
        info!("Rover base released");
    }
}
