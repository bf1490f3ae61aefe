//! padtone - a MIDI-driven sine oscillator with sixteen sample pads.
//!
//! `padtone live` plays through the default audio device with an optional
//! MIDI input and a terminal control surface. `padtone render` runs a
//! control script offline and writes a WAV file.

mod app;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io, thread};

use anyhow::{bail, Context};
use app::{Command, Outcome};
use clap::{crate_version, Args, Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use pt_master::{
    list_midi_inputs, parse_script, render_to_wav, Controller, EngineConfig, MidiPortSelector,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

#[derive(Parser)]
#[clap(
    version = crate_version!(),
    about = "A MIDI-driven sine oscillator with sixteen sample pads."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available MIDI input ports.
    Ports {},
    /// Plays through the default audio device.
    Live {
        #[clap(flatten)]
        engine: EngineArgs,
        /// MIDI input port, by index or case-insensitive name substring.
        #[arg(long)]
        midi_port: Option<MidiPortSelector>,
    },
    /// Renders a control script to a WAV file.
    Render {
        #[clap(flatten)]
        engine: EngineArgs,
        /// Script with one `<frame> <action> [args]` line per event.
        script: PathBuf,
        /// Output WAV path.
        output: PathBuf,
        /// Length of the render in seconds.
        #[arg(long, default_value_t = 2.0)]
        seconds: f32,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Directory holding pad_0.wav .. pad_15.wav.
    #[arg(long)]
    samples: Option<PathBuf>,
    /// MIDI note that triggers pad 0.
    #[arg(long, default_value_t = pt_engine::DEFAULT_PAD_BASE_NOTE)]
    pad_base_note: u8,
    /// Depth of the notification queue.
    #[arg(long = "notify-capacity", default_value_t = pt_engine::DEFAULT_NOTIFICATION_CAPACITY)]
    notification_capacity: usize,
    /// Render rate for offline output (live output uses the device rate).
    #[arg(long, default_value_t = pt_engine::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            pad_base_note: self.pad_base_note,
            notification_capacity: self.notification_capacity,
            sample_rate: self.sample_rate,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ports {} => {
            let ports = list_midi_inputs()?;
            if ports.is_empty() {
                println!("No MIDI input ports found.");
            }
            for (index, name) in ports.iter().enumerate() {
                println!("{index}: {name}");
            }
        }
        Commands::Live { engine, midi_port } => live(&engine, midi_port.as_ref())?,
        Commands::Render {
            engine,
            script,
            output,
            seconds,
        } => render(&engine, &script, &output, seconds)?,
    }

    Ok(())
}

fn live(engine: &EngineArgs, midi_port: Option<&MidiPortSelector>) -> anyhow::Result<()> {
    let mut ctrl = Controller::with_sample_dir(engine.config(), engine.samples.as_deref())?;
    let sample_rate = ctrl.start_audio().context("unable to start audio output")?;

    if let Some(selector) = midi_port {
        let port = ctrl.connect_midi(selector)?;
        println!("MIDI input: {port}");
    }
    println!("Audio running at {sample_rate} Hz. Type `help` for commands.");

    // Stdin blocks, so it gets its own thread; the main loop waits on its
    // lines and prints notifications in between.
    let (lines_tx, lines_rx) = crossbeam_channel::unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    loop {
        match lines_rx.recv_timeout(Duration::from_millis(20)) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => match line.parse::<Command>() {
                Ok(command) => match app::execute(&ctrl, command) {
                    Outcome::Reply(reply) if reply.is_empty() => {}
                    Outcome::Reply(reply) => writeln!(stdout, "{reply}")?,
                    Outcome::Quit => break,
                },
                Err(e) => writeln!(stdout, "{e} (try `help`)")?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        for notification in ctrl.poll_notifications() {
            writeln!(stdout, "> {}", app::describe(notification))?;
        }
    }

    ctrl.shutdown();
    Ok(())
}

fn render(
    engine: &EngineArgs,
    script: &Path,
    output: &Path,
    seconds: f32,
) -> anyhow::Result<()> {
    if !(seconds.is_finite() && seconds > 0.0) {
        bail!("--seconds must be positive, got {seconds}");
    }
    let config = engine.config();
    let text = fs::read_to_string(script)
        .with_context(|| format!("unable to read script {}", script.display()))?;
    let events = parse_script(&text)?;
    let samples = match &engine.samples {
        Some(dir) => pt_formats::load_pad_samples(dir)?,
        None => {
            warn!("No sample directory given, pads are silent.");
            Vec::new()
        }
    };

    let frames = (seconds * config.sample_rate as f32) as usize;
    let wav = render_to_wav(&config, samples, &events, frames)?;
    fs::write(output, &wav).with_context(|| format!("unable to write {}", output.display()))?;
    info!(
        path = %output.display(),
        frames,
        bytes = wav.len(),
        "Rendered."
    );
    Ok(())
}
