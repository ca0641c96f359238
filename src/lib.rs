// Keyboard teleoperation for a differential-drive rover
//
// Input capture (own thread) -> key registry -> resolver -> smoother -> motor sink

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod keys;
pub mod messages;
pub mod motor;
pub mod resolver;
pub mod run_flag;
pub mod runtime;
pub mod smoother;
pub mod status;
