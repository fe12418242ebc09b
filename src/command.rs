//! Command language: one line of text, one pointer action.
//!
//! The same syntax is used everywhere a command can appear: script
//! arguments, batch files, standard input, and the command half of an
//! iocanerc binding. A line is `[<verb>] [<int>] [<int>]`; a missing
//! verb with a leading digit means an absolute move.

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Warp the pointer to absolute screen coordinates.
    MoveAbsolute { x: i32, y: i32 },
    /// Warp the pointer by a relative offset.
    MoveRelative { dx: i32, dy: i32 },
    /// Park the pointer outside the visible display area.
    OffScreen,
    /// Synthesize a button press and/or release at the pointer.
    ButtonEvent {
        button: i32,
        press: bool,
        release: bool,
    },
    /// Install a font-cursor glyph on the root window.
    SetCursor { shape: i32 },
    /// Suspend processing for the given duration.
    Sleep { seconds: i32, millis: i32 },
    /// Flip interactive key grabbing on or off.
    ToggleInteractive,
    /// Terminate the run loop.
    Quit,
    /// A line no verb claimed; reported and otherwise ignored.
    Unrecognized(String),
}

impl Command {
    /// Parse a single command line.
    ///
    /// Returns `None` for blank lines and `#` comments. Everything else
    /// yields a command, with [`Command::Unrecognized`] as the terminal
    /// for lines no verb claims.
    ///
    /// A line whose first character is an ASCII digit is an implicit
    /// absolute move: the first two integers on the line are `(x, y)`.
    /// Otherwise the first character selects the verb (the rest of the
    /// verb token is ignored) and the remainder of the line is scanned
    /// for up to two integers, each defaulting to 0 when absent.
    /// Non-integer tokens are skipped.
    pub fn parse(line: &str) -> Option<Command> {
        let first = match line.chars().next() {
            None | Some('\n') | Some('#') => return None,
            Some(c) => c,
        };

        if first.is_ascii_digit() {
            let (x, y) = scan_integers(line, 0);
            return Some(Command::MoveAbsolute { x, y });
        }

        let (a, b) = scan_integers(line, 1);
        let command = match first {
            'p' => Command::OffScreen,
            'b' => Command::ButtonEvent {
                button: a,
                press: true,
                release: true,
            },
            'h' => Command::ButtonEvent {
                button: a,
                press: true,
                release: false,
            },
            'r' => Command::ButtonEvent {
                button: a,
                press: false,
                release: true,
            },
            'm' => Command::MoveRelative { dx: a, dy: b },
            'c' => Command::SetCursor { shape: a },
            's' => Command::Sleep {
                seconds: a,
                millis: b,
            },
            'i' => Command::ToggleInteractive,
            'q' | 'e' => Command::Quit,
            _ => Command::Unrecognized(line.to_string()),
        };
        Some(command)
    }

    /// Whether executing this command ends the run loop.
    pub fn is_quit(&self) -> bool {
        matches!(self, Command::Quit)
    }
}

/// Scan a line for up to two integers, skipping the first `skip`
/// whitespace-delimited tokens. An integer is a token that parses fully
/// as an `i32`; other tokens are ignored. Missing integers are 0.
fn scan_integers(line: &str, skip: usize) -> (i32, i32) {
    let mut ints = line
        .split_whitespace()
        .skip(skip)
        .filter_map(|token| token.parse::<i32>().ok());
    let a = ints.next().unwrap_or(0);
    let b = ints.next().unwrap_or(0);
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("\n"), None);
        assert_eq!(Command::parse("# park the pointer"), None);
        assert_eq!(Command::parse("#"), None);
    }

    #[test]
    fn test_implicit_absolute_move() {
        assert_eq!(
            Command::parse("100 200"),
            Some(Command::MoveAbsolute { x: 100, y: 200 })
        );
        assert_eq!(
            Command::parse("100 200 trailing garbage"),
            Some(Command::MoveAbsolute { x: 100, y: 200 })
        );
        assert_eq!(
            Command::parse("7 noise 9"),
            Some(Command::MoveAbsolute { x: 7, y: 9 })
        );
        assert_eq!(
            Command::parse("42"),
            Some(Command::MoveAbsolute { x: 42, y: 0 })
        );
    }

    #[test]
    fn test_verb_table() {
        assert_eq!(Command::parse("p"), Some(Command::OffScreen));
        assert_eq!(
            Command::parse("b 3"),
            Some(Command::ButtonEvent {
                button: 3,
                press: true,
                release: true,
            })
        );
        assert_eq!(
            Command::parse("h 1"),
            Some(Command::ButtonEvent {
                button: 1,
                press: true,
                release: false,
            })
        );
        assert_eq!(
            Command::parse("r 1"),
            Some(Command::ButtonEvent {
                button: 1,
                press: false,
                release: true,
            })
        );
        assert_eq!(
            Command::parse("m -5 17"),
            Some(Command::MoveRelative { dx: -5, dy: 17 })
        );
        assert_eq!(Command::parse("c 34"), Some(Command::SetCursor { shape: 34 }));
        assert_eq!(
            Command::parse("s 1 500"),
            Some(Command::Sleep {
                seconds: 1,
                millis: 500,
            })
        );
        assert_eq!(Command::parse("i"), Some(Command::ToggleInteractive));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("e"), Some(Command::Quit));
    }

    #[test]
    fn test_verb_first_character_only() {
        assert_eq!(
            Command::parse("move 4 2"),
            Some(Command::MoveRelative { dx: 4, dy: 2 })
        );
        assert_eq!(Command::parse("quit now"), Some(Command::Quit));
        assert_eq!(Command::parse("park"), Some(Command::OffScreen));
    }

    #[test]
    fn test_missing_integers_default_to_zero() {
        assert_eq!(
            Command::parse("b"),
            Some(Command::ButtonEvent {
                button: 0,
                press: true,
                release: true,
            })
        );
        assert_eq!(
            Command::parse("m 5"),
            Some(Command::MoveRelative { dx: 5, dy: 0 })
        );
        assert_eq!(
            Command::parse("s 2"),
            Some(Command::Sleep {
                seconds: 2,
                millis: 0,
            })
        );
    }

    #[test]
    fn test_unrecognized_verbs() {
        assert_eq!(
            Command::parse("zoom 1 2"),
            Some(Command::Unrecognized("zoom 1 2".to_string()))
        );
        // Leading whitespace is not a verb either.
        assert_eq!(
            Command::parse(" m 5"),
            Some(Command::Unrecognized(" m 5".to_string()))
        );
    }

    #[test]
    fn test_is_quit() {
        assert!(Command::parse("q").unwrap().is_quit());
        assert!(!Command::parse("p").unwrap().is_quit());
    }
}
