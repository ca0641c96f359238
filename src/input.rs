// Keyboard input capture
//
// Runs on its own OS thread. Polls the terminal with a short timeout so it
// notices a stop request promptly, records movement keys in the registry and
// clears the run flag on a quit key.
// Controls: WASD or arrows move, Space stops, Q / Esc / Ctrl+C quit.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, info, warn};

use crate::config::INPUT_POLL_TIMEOUT;
use crate::keys::KeyRegistry;
use crate::messages::DriveKey;
use crate::run_flag::RunFlag;

/// What a single input event means to the drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Drive(DriveKey),
    Quit,
    Ignore,
}

/// Map a terminal event to an action. Releases and non-key events are ignored.
pub fn classify(event: &Event) -> InputAction {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return InputAction::Ignore;
    };

    if !matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return InputAction::Ignore;
    }

    match code {
        // raw mode delivers Ctrl+C as a key instead of a signal
        KeyCode::Char('c') | KeyCode::Char('C') if modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::Quit
        }
        KeyCode::Esc => InputAction::Quit,
        KeyCode::Up => InputAction::Drive(DriveKey::Forward),
        KeyCode::Down => InputAction::Drive(DriveKey::Backward),
        KeyCode::Left => InputAction::Drive(DriveKey::Left),
        KeyCode::Right => InputAction::Drive(DriveKey::Right),
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'q' => InputAction::Quit,
            'w' => InputAction::Drive(DriveKey::Forward),
            's' => InputAction::Drive(DriveKey::Backward),
            'a' => InputAction::Drive(DriveKey::Left),
            'd' => InputAction::Drive(DriveKey::Right),
            ' ' => InputAction::Drive(DriveKey::Stop),
            _ => InputAction::Ignore,
        },
        _ => InputAction::Ignore,
    }
}

/// Source of terminal events with a bounded wait
pub trait InputSource {
    /// Wait up to `timeout` for an event. `Ok(None)` means nothing arrived.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Restores cooked mode when dropped
#[derive(Debug)]
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

/// The controlling terminal in raw mode for as long as this value lives
#[derive(Debug)]
pub struct TerminalInput {
    _raw_mode: RawModeGuard,
}

impl TerminalInput {
    pub fn open() -> io::Result<Self> {
        Ok(Self {
            _raw_mode: RawModeGuard::enable()?,
        })
    }
}

impl InputSource for TerminalInput {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Clears the run flag however the input thread exits
struct StopOnExit(RunFlag);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        self.0.request_stop();
    }
}

/// Input capture loop state
#[derive(Debug, Clone)]
pub struct InputCapture {
    registry: KeyRegistry,
    run_flag: RunFlag,
    poll_timeout: Duration,
}

impl InputCapture {
    pub fn new(registry: KeyRegistry, run_flag: RunFlag) -> Self {
        Self {
            registry,
            run_flag,
            poll_timeout: INPUT_POLL_TIMEOUT,
        }
    }

    /// Start the loop on a dedicated thread. The source, and with it the
    /// terminal mode, is dropped when the thread ends.
    pub fn spawn<S>(self, source: S) -> io::Result<JoinHandle<()>>
    where
        S: InputSource + Send + 'static,
    {
        thread::Builder::new()
            .name("input-capture".into())
            .spawn(move || self.run(source))
    }

    /// Read events until a quit key arrives or the flag is cleared elsewhere
    pub fn run<S: InputSource>(&self, mut source: S) {
        let _stop = StopOnExit(self.run_flag.clone());

        while self.run_flag.is_running() {
            let event = match source.next_event(self.poll_timeout) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    debug!("Ignoring input error: {}", e);
                    thread::sleep(self.poll_timeout);
                    continue;
                }
            };

            match classify(&event) {
                InputAction::Drive(key) => self.registry.record(key, Instant::now()),
                InputAction::Quit => {
                    info!("Quit key pressed");
                    self.run_flag.request_stop();
                    break;
                }
                InputAction::Ignore => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Replays a fixed script, then reports no input forever
    struct ScriptedInput {
        script: VecDeque<io::Result<Option<Event>>>,
        dropped: Arc<AtomicBool>,
    }

    impl ScriptedInput {
        fn new(script: Vec<io::Result<Option<Event>>>) -> Self {
            Self {
                script: script.into(),
                dropped: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
            match self.script.pop_front() {
                Some(next) => next,
                None => {
                    thread::sleep(timeout);
                    Ok(None)
                }
            }
        }
    }

    impl Drop for ScriptedInput {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn capture() -> (InputCapture, KeyRegistry, RunFlag) {
        let registry = KeyRegistry::new(Duration::from_secs(10));
        let flag = RunFlag::new();
        (InputCapture::new(registry.clone(), flag.clone()), registry, flag)
    }

    #[test]
    fn test_classify_movement_keys() {
        assert_eq!(classify(&key(KeyCode::Char('w'))), InputAction::Drive(DriveKey::Forward));
        assert_eq!(classify(&key(KeyCode::Char('S'))), InputAction::Drive(DriveKey::Backward));
        assert_eq!(classify(&key(KeyCode::Left)), InputAction::Drive(DriveKey::Left));
        assert_eq!(classify(&key(KeyCode::Char('d'))), InputAction::Drive(DriveKey::Right));
        assert_eq!(classify(&key(KeyCode::Char(' '))), InputAction::Drive(DriveKey::Stop));
    }

    #[test]
    fn test_classify_quit_keys() {
        assert_eq!(classify(&key(KeyCode::Char('q'))), InputAction::Quit);
        assert_eq!(classify(&key(KeyCode::Esc)), InputAction::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(classify(&ctrl_c), InputAction::Quit);
        assert_eq!(classify(&key(KeyCode::Char('c'))), InputAction::Ignore);
    }

    #[test]
    fn test_classify_ignores_releases_and_other_events() {
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('w'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(classify(&release), InputAction::Ignore);
        assert_eq!(classify(&Event::FocusLost), InputAction::Ignore);
        assert_eq!(classify(&key(KeyCode::Char('x'))), InputAction::Ignore);
    }

    #[test]
    fn test_records_keys_until_quit() {
        let (capture, registry, flag) = capture();
        let source = ScriptedInput::new(vec![
            Ok(Some(key(KeyCode::Char('w')))),
            Ok(None),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad byte")),
            Ok(Some(key(KeyCode::Char('a')))),
            Ok(Some(key(KeyCode::Char('z')))),
            Ok(Some(key(KeyCode::Char('q')))),
            Ok(Some(key(KeyCode::Char('s')))),
        ]);
        let dropped = source.dropped.clone();

        capture.run(source);

        assert!(!flag.is_running());
        assert!(dropped.load(Ordering::SeqCst), "source not released");
        let keys = registry.active_keys(Instant::now());
        assert!(keys.contains(&DriveKey::Forward));
        assert!(keys.contains(&DriveKey::Left));
        // nothing after the quit key is read
        assert!(!keys.contains(&DriveKey::Backward));
    }

    #[test]
    fn test_thread_exits_when_flag_cleared() {
        let (capture, _registry, flag) = capture();
        let source = ScriptedInput::new(Vec::new());
        let dropped = source.dropped.clone();

        let handle = capture.spawn(source).unwrap();
        thread::sleep(Duration::from_millis(30));
        flag.request_stop();
        handle.join().unwrap();

        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_flag_cleared_when_source_panics() {
        struct Exploding;
        impl InputSource for Exploding {
            fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
                panic!("input source failed");
            }
        }

        let (capture, _registry, flag) = capture();
        let handle = capture.spawn(Exploding).unwrap();
        assert!(handle.join().is_err());
        assert!(!flag.is_running());
    }

    #[test]
    fn test_rapid_input_while_reading() {
        let (capture, registry, flag) = capture();
        let mut script: Vec<_> = (0..1000)
            .map(|i| {
                let code = ['w', 'a', 's', 'd', ' '][i % 5];
                Ok(Some(key(KeyCode::Char(code))))
            })
            .collect();
        script.push(Ok(Some(key(KeyCode::Char('q')))));

        let handle = capture.spawn(ScriptedInput::new(script)).unwrap();
        while flag.is_running() {
            let keys = registry.active_keys(Instant::now());
            assert!(keys.len() <= DriveKey::ALL.len());
        }
        handle.join().unwrap();
        assert_eq!(registry.active_keys(Instant::now()).len(), DriveKey::ALL.len());
    }
}
