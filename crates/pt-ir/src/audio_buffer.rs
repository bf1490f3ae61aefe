//! Multichannel f32 audio buffers: owned planar and borrowed interleaved.

use alloc::vec;
use alloc::vec::Vec;

use crate::audio_traits::OutputBlock;

/// Maximum number of audio channels per buffer.
pub const MAX_CHANNELS: u16 = 8;

/// A multichannel f32 audio buffer in planar layout.
///
/// Data is stored as `channels` contiguous planes of `frames` samples each.
/// `data[ch * frames + frame]` gives the sample for channel `ch` at `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: u16,
    frames: usize,
}

impl AudioBuffer {
    /// Create a new silent buffer with the given dimensions.
    pub fn new(channels: u16, frames: usize) -> Self {
        let channels = channels.min(MAX_CHANNELS);
        Self {
            data: vec![0.0; channels as usize * frames],
            channels,
            frames,
        }
    }

    /// Fill all samples with zero.
    pub fn silence(&mut self) {
        self.data.fill(0.0);
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Read-only access to one channel's sample data.
    pub fn channel(&self, ch: u16) -> &[f32] {
        let start = ch as usize * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Mutable access to one channel's sample data.
    pub fn channel_mut(&mut self, ch: u16) -> &mut [f32] {
        let start = ch as usize * self.frames;
        let len = self.frames;
        &mut self.data[start..start + len]
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

impl OutputBlock for AudioBuffer {
    fn channels(&self) -> usize {
        self.channels as usize
    }

    fn frames(&self) -> usize {
        self.frames
    }

    fn clear(&mut self) {
        self.silence();
    }

    fn write(&mut self, ch: usize, frame: usize, value: f32) {
        self.data[ch * self.frames + frame] = value;
    }

    fn add(&mut self, ch: usize, frame: usize, value: f32) {
        self.data[ch * self.frames + frame] += value;
    }
}

/// A borrowed interleaved block, the layout audio devices hand to callbacks.
///
/// `data[frame * channels + ch]` is the sample for channel `ch` at `frame`.
#[derive(Debug)]
pub struct Interleaved<'a> {
    data: &'a mut [f32],
    channels: usize,
}

impl<'a> Interleaved<'a> {
    /// Wrap a device slice holding whole frames. A zero channel count yields
    /// an empty block.
    pub fn new(data: &'a mut [f32], channels: usize) -> Self {
        debug_assert!(
            channels == 0 || data.len() % channels == 0,
            "{} samples is not a whole number of {channels}-channel frames",
            data.len()
        );
        Self { data, channels }
    }

    /// The underlying samples.
    pub fn as_slice(&self) -> &[f32] {
        self.data
    }
}

impl OutputBlock for Interleaved<'_> {
    fn channels(&self) -> usize {
        self.channels
    }

    fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.data.len() / self.channels
        }
    }

    fn clear(&mut self) {
        self.data.fill(0.0);
    }

    fn write(&mut self, ch: usize, frame: usize, value: f32) {
        self.data[frame * self.channels + ch] = value;
    }

    fn add(&mut self, ch: usize, frame: usize, value: f32) {
        self.data[frame * self.channels + ch] += value;
    }

    fn write_frame(&mut self, frame: usize, value: f32) {
        let start = frame * self.channels;
        self.data[start..start + self.channels].fill(value);
    }
}
