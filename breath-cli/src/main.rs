//! breath - terminal breathing exercise
//!
//! Runs a guided breathing session against the real clock: the session is
//! loaded from a TOML file (or the embedded default), mounted, and driven
//! frame by frame until the requested number of cycles has played.

mod config;
mod pacer;
mod render;
mod sound;

use std::cell::Cell;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use breath_core::clock::Clock;
use breath_core::config::{BreathingPattern, ExerciseConfig};
use breath_core::exercise::{Exercise, StepView};

use crate::config::{load_session, min_elapsed_ms};
use crate::pacer::Pacer;
use crate::sound::TerminalSound;

/// Guided breathing in the terminal
#[derive(Debug, Parser)]
#[command(name = "breath", version, about)]
struct Args {
    /// Session file (TOML); the built-in box session is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a named pattern instead of the session's steps
    #[arg(short, long, value_parser = ["box", "relaxing", "calm", "coherent"])]
    preset: Option<String>,

    /// Number of full cycles to play
    #[arg(short = 'n', long, default_value_t = 3)]
    cycles: u32,

    /// Override the minimum session length (seconds)
    #[arg(long)]
    min_elapsed: Option<u64>,

    /// Time speed-up factor
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
    speed: u32,

    /// Ring the terminal bell on each cue
    #[arg(long)]
    bell: bool,

    /// No cue output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args, config) {
        Ok(done) => {
            println!("isBreathingDone: {}", done);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<ExerciseConfig, Box<dyn std::error::Error>> {
    let mut config = load_session(args.config.as_deref())?;

    if let Some(name) = args.preset.as_deref() {
        let pattern =
            BreathingPattern::by_name(name).ok_or_else(|| format!("unknown preset '{}'", name))?;
        info!("Preset '{}' overrides session steps", name);
        config.steps = pattern.steps();
    }
    if let Some(seconds) = args.min_elapsed {
        config.min_elapsed_ms = min_elapsed_ms(seconds)?;
    }

    Ok(config)
}

/// Play the session; returns whether it counted as done
fn run(args: &Args, config: ExerciseConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let frame_ms = config.timing.frame_ms.max(1);

    let sound = if args.quiet {
        TerminalSound::muted()
    } else {
        TerminalSound::new(args.bell)
    };

    let clock = Clock::new();
    let closed = Rc::new(Cell::new(None));
    let on_close = closed.clone();
    let mut exercise = Exercise::new(&clock, config, sound, move |done| on_close.set(Some(done)))
        .map_err(|e| format!("cannot start session: {:?}", e))?;

    exercise
        .mount()
        .map_err(|e| format!("cannot mount session: {:?}", e))?;

    let mut pacer = Pacer::new(args.speed);
    let mut last_step: Option<usize> = None;
    let mut stdout = std::io::stdout().lock();

    while exercise.is_mounted()
        && exercise.sequencer_state().completed_cycles < args.cycles
    {
        std::thread::sleep(Duration::from_millis(frame_ms as u64));
        clock.advance(pacer.due_ms());

        let visuals = exercise.visuals();
        let step = visuals.step.as_ref().map(|s| s.index);
        if step != last_step {
            if let Some(view) = visuals.step.as_ref() {
                print_step(&mut stdout, view)?;
            }
            last_step = step;
        }

        write!(stdout, "\r{}", render::status_line(&visuals, exercise.elapsed_ms()))?;
        stdout.flush()?;
    }
    writeln!(stdout)?;

    let done = exercise.close();
    if closed.get() != Some(done) {
        warn!("Close callback did not report completion");
    }
    drop(exercise);

    info!("Session finished, {} timers left", clock.pending());
    Ok(done)
}

fn print_step(out: &mut impl Write, step: &StepView) -> std::io::Result<()> {
    write!(out, "\r{}\r", " ".repeat(72))?;
    writeln!(out, "{}", render::step_header(step))
}
