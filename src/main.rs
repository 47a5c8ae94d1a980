//! mididiff — live and offline MIDI performance scoring.
//!
//! `listen` connects a MIDI input, routes two channels into a scoring session
//! and prints the score on a fixed interval. Commands typed on stdin
//! (`reset`, `threshold 500`, `ref 2`, `perf 10`, `quit`) adjust the running
//! session. `replay` scores a YAML take file, `devices` lists input ports.

use std::fs::OpenOptions;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mididiff::config::{default_config_path, ConfigError, MidiDiffConfig};
use mididiff::control::{control_channel, ControlEvent, ControlSender};
use mididiff::midi::{MidiError, MidiInput};
use mididiff::score::{ScoreError, ScoreResult};
use mididiff::session::{session, Session, SessionError};
use mididiff::take::{load_take, TakeError};

/// Upper bound on how long a control command waits before it is applied.
const CONTROL_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "mididiff", version, about = "Score a MIDI performance against a reference")]
struct Cli {
    /// Config file (default: ~/.mididiff/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List MIDI input ports
    Devices,
    /// Score live MIDI input
    Listen(ListenArgs),
    /// Score a YAML take file
    Replay {
        /// Take file with `reference` and `performance` event lists
        file: PathBuf,
        /// Matching threshold in milliseconds
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<i64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct ListenArgs {
    /// MIDI input device (substring match)
    #[arg(long)]
    device: Option<String>,
    /// Channel (1-16) carrying the reference performance
    #[arg(long)]
    reference_channel: Option<u8>,
    /// Channel (1-16) carrying the performance under test
    #[arg(long)]
    performance_channel: Option<u8>,
    /// Matching threshold in milliseconds
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<i64>,
    /// Score polling interval in milliseconds
    #[arg(long)]
    interval: Option<u64>,
    /// Print each result as a JSON line
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Midi(#[from] MidiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Take(#[from] TakeError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mididiff=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = MidiDiffConfig::load_from(&config_path)?;

    match cli.command {
        Command::Devices => {
            let devices = MidiInput::list_devices()?;
            if devices.is_empty() {
                println!("no MIDI input ports");
            }
            for (i, name) in devices.iter().enumerate() {
                println!("{i}: {name}");
            }
            Ok(())
        }
        Command::Listen(args) => {
            let json = args.json;
            let config = apply_overrides(config, args)?;
            listen(&config, json)
        }
        Command::Replay {
            file,
            threshold,
            json,
        } => {
            let take = load_take(&file)?;
            let result = take.score(threshold.unwrap_or(config.threshold_ms))?;
            print_result(&result, json)
        }
    }
}

/// Layer command-line flags over the file config and re-validate.
fn apply_overrides(
    mut config: MidiDiffConfig,
    args: ListenArgs,
) -> Result<MidiDiffConfig, ConfigError> {
    if args.device.is_some() {
        config.device_name = args.device;
    }
    if let Some(ch) = args.reference_channel {
        config.reference_channel = ch;
    }
    if let Some(ch) = args.performance_channel {
        config.performance_channel = ch;
    }
    if let Some(ms) = args.threshold {
        config.threshold_ms = ms;
    }
    if let Some(ms) = args.interval {
        config.poll_interval_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

fn listen(config: &MidiDiffConfig, json: bool) -> Result<(), AppError> {
    let (ingestor, mut session) = session(&config.session_config())?;
    let input = MidiInput::start(config.device_name.as_deref(), ingestor)?;
    info!(
        port = input.port_name(),
        reference_channel = config.reference_channel,
        performance_channel = config.performance_channel,
        threshold_ms = config.threshold_ms,
        "listening"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    ctrlc::set_handler(move || stop_flag.store(true, Ordering::Relaxed))?;

    let (control_tx, controls) = control_channel();
    spawn_stdin_reader(control_tx);

    let interval = Duration::from_millis(config.poll_interval_ms);
    let mut next_poll = Instant::now() + interval;

    while !stop.load(Ordering::Relaxed) {
        for event in controls.drain() {
            if !apply_control(&mut session, event) {
                stop.store(true, Ordering::Relaxed);
            }
        }

        let now = Instant::now();
        if now >= next_poll {
            print_result(&session.compute(), json)?;
            next_poll += interval;
            if next_poll < now {
                next_poll = now + interval;
            }
        }

        thread::sleep(CONTROL_TICK.min(interval));
    }

    let final_result = session.compute();
    info!(
        notes_seen = session.notes_seen(),
        dropped = session.dropped(),
        score = %final_result,
        "stopped"
    );
    Ok(())
}

/// Apply one control command. Returns `false` when the loop should stop.
fn apply_control(session: &mut Session, event: ControlEvent) -> bool {
    let outcome = match event {
        ControlEvent::Reset => {
            session.reset();
            Ok(())
        }
        ControlEvent::SetThreshold(ms) => session.set_threshold(ms),
        ControlEvent::SetReferenceChannel(ch) => session.set_reference_channel(ch),
        ControlEvent::SetPerformanceChannel(ch) => session.set_performance_channel(ch),
        ControlEvent::Quit => return false,
    };
    if let Err(e) = outcome {
        warn!("{e}");
    }
    true
}

fn spawn_stdin_reader(tx: ControlSender) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match ControlEvent::parse(&line) {
                Some(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                None => warn!(input = %line.trim(), "unknown command"),
            }
        }
    });
}

fn print_result(result: &ScoreResult, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        println!("{result}");
    }
    Ok(())
}
