// One-line status display, redrawn in place every tick

use std::fmt::Write;

use crate::keys::KeySet;
use crate::messages::{DriveKey, LinkHealth};
use crate::smoother::VelocityState;

/// Anything smaller is shown as zero
const DISPLAY_EPSILON: f64 = 0.01;

fn key_label(key: DriveKey) -> char {
    match key {
        DriveKey::Forward => 'w',
        DriveKey::Backward => 's',
        DriveKey::Left => 'a',
        DriveKey::Right => 'd',
        DriveKey::Stop => '_',
    }
}

/// Render e.g. `Keys: [ wa ] | Speed: +0.50 m/s | Steer: -0.10→-0.20 rad/s | Forward +Left`
pub fn render_status(keys: &KeySet, state: &VelocityState, health: LinkHealth) -> String {
    let keys_str: String = if keys.is_empty() {
        "none".to_string()
    } else {
        keys.iter().map(|&key| key_label(key)).collect()
    };

    let mut line = format!("Keys: [{:^4}] | ", keys_str);

    // writing to a String cannot fail
    let _ = write!(line, "Speed: {:+.2}", state.linear);
    if (state.target_linear - state.linear).abs() > DISPLAY_EPSILON {
        let _ = write!(line, "→{:+.2}", state.target_linear);
    }
    line.push_str(" m/s | ");

    let _ = write!(line, "Steer: {:+.2}", state.angular);
    if (state.target_angular - state.angular).abs() > DISPLAY_EPSILON {
        let _ = write!(line, "→{:+.2}", state.target_angular);
    }
    line.push_str(" rad/s | ");

    line.push_str(if state.linear > DISPLAY_EPSILON {
        "Forward "
    } else if state.linear < -DISPLAY_EPSILON {
        "Backward"
    } else {
        "Stopped "
    });

    line.push_str(if state.angular > DISPLAY_EPSILON {
        " +Right"
    } else if state.angular < -DISPLAY_EPSILON {
        " +Left "
    } else {
        "       "
    });

    if health == LinkHealth::DispatchFailing {
        line.push_str(" | BASE NOT RESPONDING");
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_status() {
        let line = render_status(&KeySet::new(), &VelocityState::new(), LinkHealth::Ok);
        assert_eq!(
            line,
            "Keys: [none] | Speed: +0.00 m/s | Steer: +0.00 rad/s | Stopped        "
        );
    }

    #[test]
    fn test_turning_status_shows_targets() {
        let keys = KeySet::from([DriveKey::Forward, DriveKey::Left]);
        let state = VelocityState {
            linear: 0.5,
            angular: -0.1,
            target_linear: 0.5,
            target_angular: -0.2,
        };
        let line = render_status(&keys, &state, LinkHealth::Ok);
        assert_eq!(
            line,
            "Keys: [ wa ] | Speed: +0.50 m/s | Steer: -0.10→-0.20 rad/s | Forward  +Left "
        );
    }

    #[test]
    fn test_failing_link_is_flagged() {
        let state = VelocityState {
            linear: -0.3,
            target_linear: -0.3,
            ..VelocityState::new()
        };
        let line = render_status(&KeySet::new(), &state, LinkHealth::DispatchFailing);
        assert!(line.contains("Backward"));
        assert!(line.ends_with("BASE NOT RESPONDING"));
    }
}
