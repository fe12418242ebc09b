//! The display-session capability the core runs against.
//!
//! Everything the interpreter and dispatch loop need from the display
//! server goes through the [`Session`] trait: pointer queries and
//! warps, button-event synthesis, cursor assignment, key resolution
//! and grabbing, the blocking event wait, and output flushing. The
//! production implementation is [`X11Session`]; tests inject an
//! in-memory fake.

use crate::error::Result;

#[cfg(unix)]
mod x11;
#[cfg(unix)]
pub use x11::X11Session;

#[cfg(not(unix))]
compile_error!("iocane drives an X11 display and only builds on unix targets");

/// Device-level identity of a physical key, independent of the symbolic
/// name used in configuration. On X11 this is the keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(pub u32);

/// Opaque window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowId(pub u64);

/// One pointer query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerQuery {
    /// The window the query was issued against.
    pub window: WindowId,
    /// Subwindow of `window` currently containing the pointer, if any.
    pub child: Option<WindowId>,
    /// Pointer position relative to the root window.
    pub root_x: i32,
    /// See `root_x`.
    pub root_y: i32,
    /// Pointer position relative to `window`.
    pub win_x: i32,
    /// See `win_x`.
    pub win_y: i32,
    /// Modifier/button state mask at query time.
    pub mask: u32,
}

/// Resolved target for synthesized button events: the innermost window
/// under the pointer plus the coordinates a receiving client expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTarget {
    /// Innermost window under the pointer.
    pub window: WindowId,
    /// Pointer position relative to the root window.
    pub root_x: i32,
    /// See `root_x`.
    pub root_y: i32,
    /// Pointer position relative to `window`.
    pub x: i32,
    /// See `x`.
    pub y: i32,
    /// Modifier/button state mask when the target was located.
    pub mask: u32,
}

/// An input event delivered by the display session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A key was pressed.
    KeyPress(KeyId),
    /// Any other event kind; the dispatch loop ignores these.
    Other,
}

/// Capabilities the core needs from a running display session.
///
/// The trait is intentionally narrow: it is the complete surface the
/// interpreter, configuration loader, and dispatch loop touch, so a
/// fake implementation is enough to exercise all three without a live
/// display connection.
pub trait Session {
    /// Width and height of the display in pixels.
    fn screen_size(&self) -> (i32, i32);

    /// Query pointer state against `window`, or the root when `None`.
    fn query_pointer(&mut self, window: Option<WindowId>) -> Result<PointerQuery>;

    /// Warp the pointer to absolute root coordinates.
    fn warp_absolute(&mut self, x: i32, y: i32) -> Result<()>;

    /// Warp the pointer by a relative offset.
    fn warp_relative(&mut self, dx: i32, dy: i32) -> Result<()>;

    /// Synthesize a button press or release aimed at the target window.
    fn send_button(&mut self, target: ButtonTarget, button: u8, press: bool) -> Result<()>;

    /// Install a cursor glyph on the root window.
    fn set_cursor(&mut self, shape: u32) -> Result<()>;

    /// Resolve a configuration symbol name to a key identity.
    /// `None` when the symbol names no key on this session.
    fn resolve_key(&self, symbol: &str) -> Option<KeyId>;

    /// Grab a key on the root window under every lock-state permutation,
    /// so Caps Lock or Num Lock cannot hide a binding.
    fn grab_key(&mut self, key: KeyId) -> Result<()>;

    /// Release a key grab registered by [`Session::grab_key`].
    fn ungrab_key(&mut self, key: KeyId) -> Result<()>;

    /// Block until the next input event arrives.
    fn next_event(&mut self) -> Result<SessionEvent>;

    /// Flush buffered display-protocol output.
    fn flush(&mut self) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory session for interpreter, loader, and dispatch tests.

    use super::*;
    use crate::error::Error;
    use std::collections::{BTreeSet, HashMap, VecDeque};

    /// The fake's root window id.
    pub const ROOT: u64 = 1;

    /// A side effect recorded by [`FakeSession`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        WarpAbsolute { x: i32, y: i32 },
        WarpRelative { dx: i32, dy: i32 },
        Button { window: u64, button: u8, press: bool },
        SetCursor { shape: u32 },
        Grab { key: u32 },
        Ungrab { key: u32 },
        Flush,
    }

    /// Scripted display session: a fixed window chain under the pointer,
    /// a queue of input events, and a log of every side effect.
    pub struct FakeSession {
        pub screen: (i32, i32),
        pub symbols: HashMap<String, u32>,
        /// Windows under the pointer, outermost first. Each entry is the
        /// subwindow of the previous one; the last is the innermost.
        pub chain: Vec<u64>,
        pub pointer: (i32, i32),
        pub mask: u32,
        pub grabbed: BTreeSet<u32>,
        pub calls: Vec<Call>,
        pub events: VecDeque<SessionEvent>,
    }

    impl FakeSession {
        pub fn new() -> Self {
            Self {
                screen: (1920, 1080),
                symbols: HashMap::new(),
                chain: Vec::new(),
                pointer: (400, 300),
                mask: 0,
                grabbed: BTreeSet::new(),
                calls: Vec::new(),
                events: VecDeque::new(),
            }
        }

        /// A fake that resolves the given symbol names.
        pub fn with_symbols(pairs: &[(&str, u32)]) -> Self {
            let mut session = Self::new();
            for (name, key) in pairs {
                session.symbols.insert((*name).to_string(), *key);
            }
            session
        }

        pub fn push_event(&mut self, event: SessionEvent) {
            self.events.push_back(event);
        }
    }

    impl Session for FakeSession {
        fn screen_size(&self) -> (i32, i32) {
            self.screen
        }

        fn query_pointer(&mut self, window: Option<WindowId>) -> Result<PointerQuery> {
            let (id, child) = match window {
                None => (ROOT, self.chain.first().copied()),
                Some(w) => {
                    let position = self
                        .chain
                        .iter()
                        .position(|&c| c == w.0)
                        .ok_or_else(|| Error::Platform("query against unknown window".into()))?;
                    (w.0, self.chain.get(position + 1).copied())
                }
            };
            // Fake geometry: window `id` has its origin at (id, id).
            Ok(PointerQuery {
                window: WindowId(id),
                child: child.map(WindowId),
                root_x: self.pointer.0,
                root_y: self.pointer.1,
                win_x: self.pointer.0 - id as i32,
                win_y: self.pointer.1 - id as i32,
                mask: self.mask,
            })
        }

        fn warp_absolute(&mut self, x: i32, y: i32) -> Result<()> {
            self.pointer = (x, y);
            self.calls.push(Call::WarpAbsolute { x, y });
            Ok(())
        }

        fn warp_relative(&mut self, dx: i32, dy: i32) -> Result<()> {
            self.pointer = (self.pointer.0 + dx, self.pointer.1 + dy);
            self.calls.push(Call::WarpRelative { dx, dy });
            Ok(())
        }

        fn send_button(&mut self, target: ButtonTarget, button: u8, press: bool) -> Result<()> {
            self.calls.push(Call::Button {
                window: target.window.0,
                button,
                press,
            });
            Ok(())
        }

        fn set_cursor(&mut self, shape: u32) -> Result<()> {
            self.calls.push(Call::SetCursor { shape });
            Ok(())
        }

        fn resolve_key(&self, symbol: &str) -> Option<KeyId> {
            self.symbols.get(symbol).copied().map(KeyId)
        }

        fn grab_key(&mut self, key: KeyId) -> Result<()> {
            self.grabbed.insert(key.0);
            self.calls.push(Call::Grab { key: key.0 });
            Ok(())
        }

        fn ungrab_key(&mut self, key: KeyId) -> Result<()> {
            self.grabbed.remove(&key.0);
            self.calls.push(Call::Ungrab { key: key.0 });
            Ok(())
        }

        fn next_event(&mut self) -> Result<SessionEvent> {
            self.events
                .pop_front()
                .ok_or_else(|| Error::EventWait("scripted event queue exhausted".into()))
        }

        fn flush(&mut self) -> Result<()> {
            self.calls.push(Call::Flush);
            Ok(())
        }
    }
}
