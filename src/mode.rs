//! Run modes.
//!
//! A process runs in exactly one mode, decided once at startup from the
//! command line. The only transition after that is interactive mode
//! suspending and resuming itself via the toggle key.

/// Where batch mode reads its command lines from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    Stdin,
    File,
}

/// Operating mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No mode selected yet.
    #[default]
    Unset,
    /// Execute command lines from a stream, then exit.
    Batch(BatchSource),
    /// Block on the display, dispatching bound keys.
    Interactive,
    /// Interactive with every grab except the toggle key released.
    InteractiveDisabled,
    /// Execute commands given on the command line, then exit.
    CommandOnly,
}

impl Mode {
    /// True in either interactive state, suspended or not.
    pub fn is_interactive(self) -> bool {
        matches!(self, Mode::Interactive | Mode::InteractiveDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        assert_eq!(Mode::default(), Mode::Unset);
    }

    #[test]
    fn test_is_interactive() {
        assert!(Mode::Interactive.is_interactive());
        assert!(Mode::InteractiveDisabled.is_interactive());
        assert!(!Mode::Batch(BatchSource::Stdin).is_interactive());
        assert!(!Mode::CommandOnly.is_interactive());
    }
}
