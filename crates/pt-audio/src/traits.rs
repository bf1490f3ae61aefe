//! Audio output trait and error types.

use pt_engine::EngineError;

/// Error type for device and MIDI port operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("playback error: {0}")]
    Playback(String),
    /// No audio device available
    #[error("no audio device available")]
    NoDevice,
    /// The engine rejected the device configuration
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Failed to open the MIDI subsystem or read port names
    #[error("MIDI init error: {0}")]
    MidiInit(String),
    /// No MIDI input matched the requested port
    #[error("no MIDI input port matches {0}")]
    NoMidiPort(String),
    /// Failed to connect to a MIDI input
    #[error("MIDI connect error: {0}")]
    MidiConnect(String),
}

/// Trait for audio output backends.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Number of interleaved output channels.
    fn channels(&self) -> usize;

    /// Start (or resume) the device callback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Pause the device callback.
    fn stop(&mut self) -> Result<(), AudioError>;
}
