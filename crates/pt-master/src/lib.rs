//! Headless controller for padtone.
//!
//! Wires the engine to the audio device and a MIDI input, and provides
//! offline rendering, so the CLI and tests share one API.

mod offline;

use std::path::Path;
use std::time::Duration;

use pt_audio::{connect_midi_input, AudioOutput, CpalOutput, MidiConnection};
use pt_engine::{build_engine, EngineParts, NotificationReceiver};
use tracing::{info, warn};

// Re-export common types so callers don't need every crate directly.
pub use pt_audio::{list_midi_inputs, AudioError, MidiPortSelector};
pub use pt_engine::{
    Controls, EngineConfig, EngineError, MidiRouter, Notification, RenderEngine, PAD_COUNT,
};
pub use pt_formats::FormatError;
pub use pt_ir::{AudioBuffer, ParamId, Sample};

pub use offline::{parse_script, render_offline, render_to_wav, ScriptAction, ScriptEvent};

/// Errors from controller setup and offline rendering.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    /// The render engine already went to a device (or was taken).
    #[error("audio output already started")]
    AudioAlreadyStarted,
    #[error("MIDI input already connected to {0}")]
    MidiAlreadyConnected(String),
    /// A line of an offline render script could not be parsed.
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
}

/// Headless controller: owns the engine handles, the audio stream and the
/// MIDI connection.
pub struct Controller {
    config: EngineConfig,
    controls: Controls,
    router: MidiRouter,
    notifications: NotificationReceiver,
    renderer: Option<RenderEngine>,
    output: Option<CpalOutput>,
    midi: Option<MidiConnection>,
}

impl Controller {
    /// Build an engine from `config` and per-pad samples (pad order, `None`
    /// for silent pads).
    pub fn new<I>(config: EngineConfig, samples: I) -> Result<Self, ControllerError>
    where
        I: IntoIterator<Item = Option<Sample>>,
    {
        let EngineParts {
            controls,
            renderer,
            router,
            notifications,
        } = build_engine(&config, samples)?;
        Ok(Self {
            config,
            controls,
            router,
            notifications,
            renderer: Some(renderer),
            output: None,
            midi: None,
        })
    }

    /// Build an engine with pad samples loaded from `dir`, or no samples at all.
    pub fn with_sample_dir(config: EngineConfig, dir: Option<&Path>) -> Result<Self, ControllerError> {
        let samples = match dir {
            Some(dir) => pt_formats::load_pad_samples(dir)?,
            None => Vec::new(),
        };
        Self::new(config, samples)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Device wiring ---

    /// Open the default output device and move the render engine into its
    /// callback. Returns the device sample rate.
    ///
    /// The engine is consumed even if the stream fails to start.
    pub fn start_audio(&mut self) -> Result<u32, ControllerError> {
        if self.renderer.is_none() {
            return Err(ControllerError::AudioAlreadyStarted);
        }
        let mut output = CpalOutput::new()?;
        let renderer = self.renderer.take().ok_or(ControllerError::AudioAlreadyStarted)?;
        output.build_stream(renderer)?;
        let sample_rate = output.sample_rate();
        info!(sample_rate, channels = output.channels(), "Audio started.");
        self.output = Some(output);
        Ok(sample_rate)
    }

    /// Take the render engine to drive it directly instead of through a
    /// device, e.g. from a test harness.
    pub fn take_renderer(&mut self) -> Option<RenderEngine> {
        self.renderer.take()
    }

    /// Connect a MIDI input port to the router. Returns the port name.
    pub fn connect_midi(&mut self, selector: &MidiPortSelector) -> Result<String, ControllerError> {
        if let Some(midi) = &self.midi {
            return Err(ControllerError::MidiAlreadyConnected(midi.port_name().to_string()));
        }
        let connection = connect_midi_input(selector, self.router.clone())?;
        let name = connection.port_name().to_string();
        self.midi = Some(connection);
        Ok(name)
    }

    pub fn is_audio_running(&self) -> bool {
        self.output.as_ref().is_some_and(CpalOutput::is_open)
    }

    pub fn midi_port(&self) -> Option<&str> {
        self.midi
            .as_ref()
            .filter(|midi| midi.is_open())
            .map(MidiConnection::port_name)
    }

    // --- Engine handles ---

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// A router handle for feeding MIDI from somewhere other than a port.
    pub fn router(&self) -> MidiRouter {
        self.router.clone()
    }

    /// Everything queued since the last poll, oldest first.
    pub fn poll_notifications(&self) -> Vec<Notification> {
        self.notifications.drain().collect()
    }

    /// Wait up to `timeout` for one notification.
    pub fn wait_notification(&self, timeout: Duration) -> Option<Notification> {
        self.notifications.recv_timeout(timeout)
    }

    /// Notifications evicted because the queue was full.
    pub fn dropped_notifications(&self) -> u64 {
        self.notifications.dropped()
    }

    // --- Shutdown ---

    /// Stop MIDI delivery and unregister the render callback, then release
    /// the engine. Idempotent.
    pub fn shutdown(&mut self) {
        let had_io = self.midi.is_some() || self.output.is_some();

        // Phase 1: no new events in, no more callbacks.
        if let Some(mut midi) = self.midi.take() {
            midi.close();
        }
        if let Some(mut output) = self.output.take() {
            if let Err(e) = output.stop() {
                warn!(err = %e, "Unable to pause audio output.");
            }
            output.close();
        }

        // Phase 2: nothing else references the render state.
        self.renderer = None;

        let dropped = self.notifications.dropped();
        if had_io {
            info!(dropped_notifications = dropped, "Controller shut down.");
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
