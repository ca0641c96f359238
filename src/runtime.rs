// 20 Hz teleop control loop with a smooth stop on exit
//
// The input thread only ever writes the key registry. Velocity state and the
// motor sink belong to this loop alone, so neither needs a lock.

use std::io::Write;
use std::time::{Duration, Instant};

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{DriveLimits, TeleopConfig};
use crate::error::TeleopError;
use crate::input::{InputCapture, TerminalInput};
use crate::keys::{KeyRegistry, KeySet};
use crate::messages::{LinkHealth, Velocity};
use crate::motor::{MotorSink, SerialBase, SimulatedBase};
use crate::resolver::resolve_target;
use crate::run_flag::RunFlag;
use crate::smoother::VelocityState;
use crate::status::render_status;

pub struct Teleop<S: MotorSink> {
    registry: KeyRegistry,
    limits: DriveLimits,
    state: VelocityState,
    sink: S,
    health: LinkHealth,
    last_keys: KeySet,
}

impl<S: MotorSink> Teleop<S> {
    /// Starts at rest
    pub fn new(registry: KeyRegistry, limits: DriveLimits, sink: S) -> Self {
        Self {
            registry,
            limits,
            state: VelocityState::new(),
            sink,
            health: LinkHealth::Ok,
            last_keys: KeySet::new(),
        }
    }

    pub fn state(&self) -> &VelocityState {
        &self.state
    }

    pub fn health(&self) -> LinkHealth {
        self.health
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give up the sink; dropping it releases the base
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// One control tick: snapshot keys, resolve, smooth, dispatch
    pub fn tick(&mut self, now: Instant) -> Velocity {
        let keys = self.registry.active_keys(now);
        let target = resolve_target(&keys, &self.limits);

        if target.emergency_stop && !self.state.is_at_rest() {
            info!("Emergency stop");
        }
        self.state.apply(target, &self.limits);
        self.last_keys = keys;

        let velocity = self.state.velocity();
        self.dispatch(velocity);
        velocity
    }

    /// Fire-and-forget send. A failure only affects this tick; the next
    /// tick sends a freshly computed command anyway.
    fn dispatch(&mut self, velocity: Velocity) {
        match self.sink.set_velocity(velocity.linear, velocity.angular) {
            Ok(()) => {
                if self.health == LinkHealth::DispatchFailing {
                    info!("Motor base accepting commands again");
                }
                self.health = LinkHealth::Ok;
            }
            Err(e) => {
                if self.health == LinkHealth::Ok {
                    warn!("Failed to send velocity command: {}", e);
                } else {
                    debug!("Velocity command still failing: {}", e);
                }
                self.health = LinkHealth::DispatchFailing;
            }
        }
    }

    /// Ramp to rest at the tick rate, then send one explicit zero command.
    /// Dispatch failures do not cut the ramp short.
    pub async fn park(&mut self, ticker: &mut Interval) {
        self.state.clear_targets();

        while !self.state.is_at_rest() {
            ticker.tick().await;
            self.state.smooth(&self.limits);
            self.dispatch(self.state.velocity());
        }

        self.dispatch(Velocity::zero());
        info!("Base at rest");
    }

    pub fn status_line(&self) -> String {
        render_status(&self.last_keys, &self.state, self.health)
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

fn print_status(line: &str) {
    let mut stdout = std::io::stdout();
    // status is cosmetic, never worth failing over
    let _ = write!(stdout, "\r{}  ", line);
    let _ = stdout.flush();
}

/// Tick until the run flag clears, then park the base
pub async fn drive<S: MotorSink>(
    teleop: &mut Teleop<S>,
    run_flag: &RunFlag,
    period: Duration,
    show_status: bool,
) {
    let mut ticker = ticker(period);

    while run_flag.is_running() {
        tokio::select! {
            _ = ticker.tick() => {
                teleop.tick(tokio::time::Instant::now().into_std());
                if show_status {
                    print_status(&teleop.status_line());
                }
            }
            _ = run_flag.stopped() => break,
        }
    }

    if show_status {
        println!("\r");
    }
    info!("Stopping smoothly...");
    teleop.park(&mut ticker).await;
}

fn print_controls(config: &TeleopConfig) {
    info!("=== Rover Teleop ===");
    info!("Controls (hold keys to move): W/S forward/backward, A/D turn left/right");
    info!("W+A/D: move + turn | Space: emergency stop | Q/Esc: quit");
    info!(
        "Max speed {} m/s, min turn speed {} m/s, {}Hz loop, {}ms key timeout",
        config.limits.max_speed,
        config.limits.min_turn_speed,
        config.tick_rate_hz,
        config.key_timeout.as_millis()
    );
}

pub async fn run(config: TeleopConfig) -> Result<(), TeleopError> {
    config.validate()?;

    let sink: Box<dyn MotorSink> = if config.dry_run {
        info!("Dry run: commands are logged, nothing moves");
        Box::new(SimulatedBase::new())
    } else {
        Box::new(SerialBase::open(&config.port, config.baudrate, config.protocol)?)
    };

    let registry = KeyRegistry::new(config.key_timeout);
    let run_flag = RunFlag::new();

    print_controls(&config);
    let terminal = TerminalInput::open().map_err(TeleopError::Terminal)?;
    let input = InputCapture::new(registry.clone(), run_flag.clone())
        .spawn(terminal)
        .map_err(TeleopError::InputSpawn)?;

    // SIGINT from outside the terminal, e.g. `kill -INT`
    let interrupt = {
        let run_flag = run_flag.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() && run_flag.request_stop() {
                info!("Interrupt received");
            }
        })
    };

    let mut teleop = Teleop::new(registry, config.limits, sink);
    drive(&mut teleop, &run_flag, config.tick_interval(), config.show_status).await;
    drop(teleop.into_sink());

    interrupt.abort();
    run_flag.request_stop();
    input.join().map_err(|_| TeleopError::InputPanicked)?;

    info!("Robot stopped. Goodbye!");
    Ok(())
}
