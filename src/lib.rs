//! # iocane
//!
//! X11 pointer automation: scripted motion, synthesized button events,
//! and hotkey-bound commands.
//!
//! One small command language drives everything. A line arrives from a
//! script file, standard input, a `-c` argument, or a key binding, and
//! the engine executes it against the display:
//!
//! | Line      | Effect                                             |
//! |-----------|----------------------------------------------------|
//! | `X Y`     | warp the pointer to absolute coordinates           |
//! | `m DX DY` | warp the pointer by a relative offset              |
//! | `p`       | park the pointer off the bottom-right screen edge  |
//! | `b N`     | click button N (press and release)                 |
//! | `h N`     | hold button N (press only)                         |
//! | `r N`     | release button N                                   |
//! | `c N`     | set the root cursor to font-cursor glyph N         |
//! | `s S MS`  | sleep S seconds plus MS milliseconds               |
//! | `i`       | toggle interactive key dispatch                    |
//! | `q`, `e`  | quit                                               |
//!
//! Blank lines and lines starting with `#` are comments.
//!
//! ## Quick Start
//!
//! ### Driving the pointer
//!
//! ```no_run
//! use iocane::{Engine, X11Session};
//!
//! let session = X11Session::open().expect("no X display");
//! let mut engine = Engine::new(session);
//! engine.run_line("200 340").expect("move failed");
//! engine.run_line("b 1").expect("click failed");
//! ```
//!
//! ### Binding hotkeys
//!
//! An iocanerc file (`$HOME/.iocanerc`, falling back to
//! `/usr/share/iocane/iocanerc`) binds keysym names to command lines:
//!
//! ```text
//! # numpad pointer control
//! KP_Left  m -10 0
//! KP_Right m 10 0
//! KP_Enter b 1
//! Pause    i
//! Escape   e
//! ```
//!
//! Running `iocane` with no arguments grabs every bound key and
//! dispatches presses until a quit command runs. The `i` binding
//! suspends and resumes all the other grabs, so the bound keys can be
//! typed normally in between.
//!
//! ## Architecture
//!
//! The interpreter, binding table, and dispatch loop run against the
//! [`Session`] trait rather than Xlib directly; [`X11Session`] is the
//! production implementation and tests substitute an in-memory fake.
//! Everything runs on one thread, with the display event wait as the
//! only blocking point.

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod mode;
pub mod session;

// Re-exports
pub use command::Command;
pub use config::{BindingTable, KeyBinding};
pub use engine::Engine;
pub use error::{Error, Result};
pub use mode::{BatchSource, Mode};
pub use session::{ButtonTarget, KeyId, PointerQuery, Session, SessionEvent, WindowId};
#[cfg(unix)]
pub use session::X11Session;
