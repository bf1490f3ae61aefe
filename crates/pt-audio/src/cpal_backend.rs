//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use pt_engine::RenderEngine;
use tracing::{error, info};

use crate::traits::{AudioError, AudioOutput};

/// CPAL-based audio output.
///
/// The [`RenderEngine`] moves into the device callback and renders straight
/// into the device's interleaved buffer; nothing is queued in between.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl CpalOutput {
    /// Open the default output device at its default configuration.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let config: StreamConfig = config.into();

        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "Opened audio output."
        );

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Configure `engine` for this device, hand it to the callback and start
    /// the stream.
    pub fn build_stream(&mut self, mut engine: RenderEngine) -> Result<(), AudioError> {
        engine.configure(self.config.sample_rate.0)?;
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    engine.render_interleaved(data, channels);
                },
                |err| error!(err = %err, "Audio stream error."),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        self.stream = Some(stream);
        self.start()
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Drop the stream, unregistering the render callback. The engine is
    /// dropped with it.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            info!("Closed audio output.");
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn channels(&self) -> usize {
        self.config.channels as usize
    }

    fn start(&mut self) -> Result<(), AudioError> {
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        self.close();
    }
}
