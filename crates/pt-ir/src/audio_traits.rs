//! Output block trait shared by every render target.

/// A writable block of audio frames.
///
/// The engine renders through this trait so the same code drives a device's
/// interleaved callback slice and a planar offline buffer. Indices are
/// `(channel, frame)`; callers stay within `channels()` x `frames()`.
pub trait OutputBlock {
    /// Number of output channels.
    fn channels(&self) -> usize;

    /// Number of frames in the block.
    fn frames(&self) -> usize;

    /// Fill the whole block with silence.
    fn clear(&mut self);

    /// Overwrite one sample.
    fn write(&mut self, ch: usize, frame: usize, value: f32);

    /// Sum a value into one sample.
    fn add(&mut self, ch: usize, frame: usize, value: f32);

    /// Write the same value to every channel of a frame.
    fn write_frame(&mut self, frame: usize, value: f32) {
        for ch in 0..self.channels() {
            self.write(ch, frame, value);
        }
    }
}
