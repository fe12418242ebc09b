//! Command-line front end.
//!
//! Argument parsing, logger setup, display connection, and mode
//! selection live here; everything after that is [`Engine`] calls.

use crate::config;
use crate::engine::Engine;
use crate::mode::{BatchSource, Mode};
use crate::session::{Session, X11Session};
use anyhow::Context;
use clap::Parser;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

/// X11 pointer automation: scripted motion, synthesized clicks, and
/// hotkey-bound commands.
#[derive(Debug, Parser)]
#[command(name = "iocane", version)]
struct Cli {
    /// Read command lines from standard input
    #[arg(short = 's', long, group = "source")]
    stdin: bool,

    /// Grab the keys bound in the iocanerc and dispatch them until quit
    #[arg(short = 'i', long, group = "source")]
    interactive: bool,

    /// Execute one command line and continue (repeatable)
    #[arg(short = 'c', long, value_name = "CMD", group = "source")]
    command: Vec<String>,

    /// Script file of command lines
    #[arg(value_name = "FILE", group = "source")]
    file: Option<PathBuf>,
}

/// Parse arguments, connect to the display, and run the selected mode.
///
/// With no mode argument at all, behaves as `--interactive`.
pub fn run<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let session = X11Session::open().context("cannot connect to the X display")?;
    let mut engine = Engine::new(session);

    if !cli.command.is_empty() {
        engine.set_mode(Mode::CommandOnly);
        engine.run_commands(&cli.command)?;
    } else if cli.stdin {
        engine.set_mode(Mode::Batch(BatchSource::Stdin));
        engine.run_batch(io::stdin().lock())?;
    } else if cli.interactive {
        interactive(&mut engine)?;
    } else if let Some(path) = &cli.file {
        engine.set_mode(Mode::Batch(BatchSource::File));
        let script =
            File::open(path).with_context(|| format!("cannot read script {}", path.display()))?;
        engine.run_batch(BufReader::new(script))?;
    } else {
        interactive(&mut engine)?;
    }
    Ok(())
}

fn interactive<S: Session>(engine: &mut Engine<S>) -> anyhow::Result<()> {
    let text = config::read_rc().context("interactive mode needs an iocanerc file")?;
    engine.load_bindings(&text);
    engine.set_mode(Mode::Interactive);
    engine.run_interactive()?;
    Ok(())
}
