// Value types passed between input, resolver, smoother and motor sink

/// Keys the drive responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DriveKey {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl DriveKey {
    pub const ALL: [DriveKey; 5] = [
        DriveKey::Forward,
        DriveKey::Backward,
        DriveKey::Left,
        DriveKey::Right,
        DriveKey::Stop,
    ];
}

/// Differential-drive command: linear m/s (positive = forward),
/// angular rad/s (positive = right turn, left is negative)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub linear: f64,
    pub angular: f64,
}

impl Velocity {
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// What the resolver wants this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Target {
    pub velocity: Velocity,
    /// Stop key held: zero the live velocity without ramping
    pub emergency_stop: bool,
}

impl Target {
    pub fn rest() -> Self {
        Self::default()
    }
}

/// Whether the motor base is accepting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHealth {
    Ok,
    DispatchFailing,
}
