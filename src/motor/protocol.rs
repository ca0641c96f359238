// JSON line protocol for the rover base controller
//
// One JSON object per line. The "T" field selects the command:
// - 13: body velocity, X = linear m/s, Z = angular rad/s
// - 1:  wheel speeds, L/R in m/s

use serde::Serialize;

use super::kinematics::body_to_wheels;

/// Command type codes understood by the base controller
pub const CMD_BODY_VELOCITY: u8 = 13;
pub const CMD_WHEEL_SPEED: u8 = 1;

/// Which frame the base is driven with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CommandProtocol {
    /// Body velocity frames; the controller does its own kinematics
    #[default]
    Velocity,
    /// Per-wheel speed frames computed on this side
    Wheels,
}

/// A single command frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BaseFrame {
    Velocity {
        #[serde(rename = "T")]
        kind: u8,
        #[serde(rename = "X")]
        linear: f64,
        #[serde(rename = "Z")]
        angular: f64,
    },
    Wheels {
        #[serde(rename = "T")]
        kind: u8,
        #[serde(rename = "L")]
        left: f64,
        #[serde(rename = "R")]
        right: f64,
    },
}

impl BaseFrame {
    /// Build the frame for a body velocity under the given protocol
    pub fn for_velocity(protocol: CommandProtocol, linear: f64, angular: f64) -> Self {
        match protocol {
            CommandProtocol::Velocity => BaseFrame::Velocity {
                kind: CMD_BODY_VELOCITY,
                linear,
                angular,
            },
            CommandProtocol::Wheels => {
                let wheels = body_to_wheels(linear, angular);
                BaseFrame::Wheels {
                    kind: CMD_WHEEL_SPEED,
                    left: wheels.left,
                    right: wheels.right,
                }
            }
        }
    }
}

/// Serialize a frame as a newline-terminated JSON line
pub fn encode_frame(frame: &BaseFrame) -> serde_json::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(frame)?;
    line.push(b'\n');
    Ok(line)
}
