//! Command execution and event dispatch.
//!
//! [`Engine`] owns the display session, the key-binding table, and the
//! run state. Text lines come in from a batch stream, the command line,
//! or a key binding; each is interpreted and executed against the
//! session, with a flush after every display-touching command so
//! streams execute in submission order.

use crate::command::Command;
use crate::config::{self, BindingTable};
use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::session::{ButtonTarget, KeyId, Session, SessionEvent};
use std::io::BufRead;
use std::thread;
use std::time::Duration;

/// Pause between locating a button target and synthesizing each half of
/// the event, so the client under the pointer sees a settled pointer.
pub(crate) const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Executes commands against a display session.
pub struct Engine<S: Session> {
    session: S,
    bindings: BindingTable,
    toggle_key: Option<KeyId>,
    mode: Mode,
    running: bool,
}

impl<S: Session> Engine<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            bindings: BindingTable::new(),
            toggle_key: None,
            mode: Mode::default(),
            running: true,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn toggle_key(&self) -> Option<KeyId> {
        self.toggle_key
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// False once a quit command has executed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Parse rc text against this engine's session and install the
    /// resulting bindings and toggle key.
    pub fn load_bindings(&mut self, text: &str) {
        let (table, toggle) = config::load(text, &self.session);
        log::debug!("loaded {} bindings", table.len());
        self.bindings = table;
        self.toggle_key = toggle;
    }

    /// Interpret and execute one command line.
    pub fn run_line(&mut self, line: &str) -> Result<()> {
        match Command::parse(line) {
            Some(command) => self.execute(command),
            None => Ok(()),
        }
    }

    /// Execute command lines from a reader until it ends or a quit
    /// command runs.
    pub fn run_batch<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            if !self.running {
                break;
            }
            self.run_line(&line?)?;
        }
        Ok(())
    }

    /// Execute command lines given as arguments, in order.
    pub fn run_commands(&mut self, commands: &[String]) -> Result<()> {
        for line in commands {
            if !self.running {
                break;
            }
            self.run_line(line)?;
        }
        Ok(())
    }

    /// Grab every bound key and dispatch key presses until a quit
    /// command runs.
    ///
    /// Blocks on the session's event wait. Only key-press events are
    /// acted on; the termination check sits at the iteration boundary,
    /// so a quit dispatched from a binding exits before the next wait.
    pub fn run_interactive(&mut self) -> Result<()> {
        if self.mode != Mode::Interactive {
            return Err(Error::NotInteractive);
        }
        if let Some(key) = self.toggle_key {
            self.session.grab_key(key)?;
        }
        for key in self.toggled_keys() {
            self.session.grab_key(key)?;
        }
        self.session.flush()?;
        if self.bindings.is_empty() && self.toggle_key.is_none() {
            log::warn!("interactive mode with no bindings; only a signal can stop this process");
        }

        while self.running {
            match self.session.next_event()? {
                SessionEvent::KeyPress(key) => self.dispatch_key(key)?,
                SessionEvent::Other => {}
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::MoveAbsolute { x, y } => {
                self.session.warp_absolute(x, y)?;
                self.session.flush()
            }
            Command::MoveRelative { dx, dy } => {
                self.session.warp_relative(dx, dy)?;
                self.session.flush()
            }
            Command::OffScreen => {
                let (width, height) = self.session.screen_size();
                self.session.warp_absolute(width, height)?;
                self.session.flush()
            }
            Command::ButtonEvent {
                button,
                press,
                release,
            } => self.button_event(button, press, release),
            Command::SetCursor { shape } => {
                if shape < 0 {
                    log::warn!("ignoring negative cursor shape {shape}");
                    return Ok(());
                }
                self.session.set_cursor(shape as u32)?;
                self.session.flush()
            }
            Command::Sleep { seconds, millis } => {
                thread::sleep(
                    Duration::from_secs(seconds.max(0) as u64)
                        + Duration::from_millis(millis.max(0) as u64),
                );
                Ok(())
            }
            Command::ToggleInteractive => self.toggle_interactive(),
            Command::Quit => {
                self.running = false;
                Ok(())
            }
            Command::Unrecognized(line) => {
                log::warn!("unrecognized command: {line}");
                Ok(())
            }
        }
    }

    fn button_event(&mut self, button: i32, press: bool, release: bool) -> Result<()> {
        if !(1..=7).contains(&button) {
            log::debug!("button {button} out of range, ignoring");
            return Ok(());
        }
        let button = button as u8;
        let target = self.locate_pointer()?;
        if press {
            thread::sleep(SETTLE_DELAY);
            self.session.send_button(target, button, true)?;
            self.session.flush()?;
        }
        if release {
            thread::sleep(SETTLE_DELAY);
            self.session.send_button(target, button, false)?;
            self.session.flush()?;
        }
        Ok(())
    }

    /// Innermost window under the pointer, found by descending the
    /// subwindow chain from the root.
    fn locate_pointer(&mut self) -> Result<ButtonTarget> {
        let mut query = self.session.query_pointer(None)?;
        while let Some(child) = query.child {
            query = self.session.query_pointer(Some(child))?;
        }
        Ok(ButtonTarget {
            window: query.window,
            root_x: query.root_x,
            root_y: query.root_y,
            x: query.win_x,
            y: query.win_y,
            mask: query.mask,
        })
    }

    /// Suspend or resume key dispatch. Outside interactive mode this is
    /// a no-op; the toggle key itself stays grabbed throughout so the
    /// suspension is reversible.
    fn toggle_interactive(&mut self) -> Result<()> {
        match self.mode {
            Mode::Interactive => {
                for key in self.toggled_keys() {
                    self.session.ungrab_key(key)?;
                }
                self.session.flush()?;
                self.mode = Mode::InteractiveDisabled;
                log::info!("key bindings suspended");
                Ok(())
            }
            Mode::InteractiveDisabled => {
                for key in self.toggled_keys() {
                    self.session.grab_key(key)?;
                }
                self.session.flush()?;
                self.mode = Mode::Interactive;
                log::info!("key bindings restored");
                Ok(())
            }
            _ => {
                log::warn!("toggle command outside interactive mode, ignoring");
                Ok(())
            }
        }
    }

    /// Keys affected by a toggle: every bound key once, minus the
    /// toggle key.
    fn toggled_keys(&self) -> Vec<KeyId> {
        self.bindings
            .distinct_keys()
            .into_iter()
            .filter(|key| Some(*key) != self.toggle_key)
            .collect()
    }

    fn dispatch_key(&mut self, key: KeyId) -> Result<()> {
        if self.toggle_key == Some(key) {
            return self.toggle_interactive();
        }
        let Some(line) = self.bindings.lookup(key).map(str::to_owned) else {
            log::debug!("key press with no binding: {key:?}");
            return Ok(());
        };
        self.run_line(&line)
    }
}
