//! Key-binding configuration.
//!
//! An iocanerc file is a line-oriented list of `SYMBOL COMMAND` pairs.
//! The symbol is an X keysym name (a leading `XK_` prefix is accepted)
//! and the command is any interpreter line, bound verbatim. Lines that
//! are empty or start with `#` are skipped, as are symbols the display
//! cannot resolve to a keycode.

use crate::error::{Error, Result};
use crate::session::{KeyId, Session};
use std::path::PathBuf;

/// Longest keysym name kept from a binding line.
const MAX_SYMBOL_LEN: usize = 32;

/// System-wide fallback when the user has no rc file.
const SYSTEM_RC: &str = "/usr/share/iocane/iocanerc";

/// One resolved binding: a device keycode and the command text it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: KeyId,
    pub command: String,
}

/// Ordered collection of key bindings.
///
/// Order is load order, and lookup takes the first match, so an earlier
/// line shadows a later one bound to the same key.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: Vec<KeyBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, binding: KeyBinding) {
        self.entries.push(binding);
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First non-empty command bound to `key`, if any.
    pub fn lookup(&self, key: KeyId) -> Option<&str> {
        self.entries
            .iter()
            .find(|binding| binding.key == key && !binding.command.is_empty())
            .map(|binding| binding.command.as_str())
    }

    /// Every bound keycode once, in first-seen order.
    pub fn distinct_keys(&self) -> Vec<KeyId> {
        let mut keys: Vec<KeyId> = Vec::with_capacity(self.entries.len());
        for binding in &self.entries {
            if !keys.contains(&binding.key) {
                keys.push(binding.key);
            }
        }
        keys
    }
}

/// Parse rc text into a binding table, resolving each symbol against
/// the session's keymap.
///
/// A line whose command starts with `i` designates the interactive
/// toggle key instead of becoming an ordinary binding; the last such
/// line wins. Returns the table and the toggle key, if one was named.
pub fn load<S: Session>(text: &str, session: &S) -> (BindingTable, Option<KeyId>) {
    let mut table = BindingTable::new();
    let mut toggle = None;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((symbol, command)) = line.split_once(' ') else {
            log::debug!("ignoring binding line without a command: {line:?}");
            continue;
        };
        let symbol = clip_symbol(symbol);
        let symbol = symbol.strip_prefix("XK_").unwrap_or(symbol);
        let Some(key) = session.resolve_key(symbol) else {
            log::debug!("ignoring binding for unknown keysym {symbol:?}");
            continue;
        };
        let command = command.trim_start();
        if command.starts_with('i') {
            toggle = Some(key);
        } else {
            table.push(KeyBinding {
                key,
                command: command.to_owned(),
            });
        }
    }

    (table, toggle)
}

/// Path of the rc file to load: `$HOME/.iocanerc` if it exists,
/// otherwise the system-wide copy.
pub fn locate_rc() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        let user_rc = PathBuf::from(home).join(".iocanerc");
        if user_rc.is_file() {
            return Some(user_rc);
        }
    }
    let system_rc = PathBuf::from(SYSTEM_RC);
    system_rc.is_file().then_some(system_rc)
}

/// Read the rc file found by [`locate_rc`].
pub fn read_rc() -> Result<String> {
    let path = locate_rc().ok_or(Error::ConfigMissing)?;
    Ok(std::fs::read_to_string(path)?)
}

/// Truncate an overlong symbol token on a character boundary.
fn clip_symbol(symbol: &str) -> &str {
    match symbol.char_indices().nth(MAX_SYMBOL_LEN) {
        Some((index, _)) => &symbol[..index],
        None => symbol,
    }
}
