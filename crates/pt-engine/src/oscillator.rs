//! Sine oscillator voice.

use core::f64::consts::TAU;

use pt_ir::OutputBlock;

use crate::frequency::phase_increment;

/// Phase-accumulator sine generator.
///
/// The accumulator is copied once per block, advanced per frame and written
/// back after the block, so every channel of a frame gets the same value and
/// consecutive blocks continue the waveform exactly.
#[derive(Clone, Debug)]
pub struct OscillatorVoice {
    /// Current phase in radians, always in [0, 2π).
    phase: f64,
    sample_rate: u32,
}

impl OscillatorVoice {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Restart the waveform at phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Overwrite every channel of `out` with `volume * sin(φ)` at `frequency` Hz.
    pub fn render<B: OutputBlock + ?Sized>(&mut self, out: &mut B, frequency: f32, volume: f32) {
        let increment = phase_increment(frequency, self.sample_rate);
        let mut phase = self.phase;

        for frame in 0..out.frames() {
            out.write_frame(frame, volume * phase.sin() as f32);
            phase += increment;
            if phase >= TAU {
                phase %= TAU;
            }
        }

        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_ir::{AudioBuffer, Interleaved};

    const SAMPLE_RATE: u32 = 48000;

    fn expected(frequency: f32, volume: f32, k: usize) -> f32 {
        volume * (TAU * frequency as f64 * k as f64 / SAMPLE_RATE as f64).sin() as f32
    }

    #[test]
    fn renders_sine_from_zero_phase() {
        let mut osc = OscillatorVoice::new(SAMPLE_RATE);
        let mut buf = AudioBuffer::new(1, 480);
        osc.render(&mut buf, 1000.0, 0.8);
        for (k, &s) in buf.channel(0).iter().enumerate() {
            assert!((s - expected(1000.0, 0.8, k)).abs() < 1e-5, "frame {k}: {s}");
        }
    }

    #[test]
    fn channels_are_phase_coherent() {
        let mut osc = OscillatorVoice::new(SAMPLE_RATE);
        let mut buf = AudioBuffer::new(4, 64);
        osc.render(&mut buf, 330.0, 0.5);
        for ch in 1..4 {
            assert_eq!(buf.channel(ch), buf.channel(0));
        }
    }

    #[test]
    fn split_blocks_match_single_block() {
        let mut whole = OscillatorVoice::new(SAMPLE_RATE);
        let mut single = AudioBuffer::new(1, 300);
        whole.render(&mut single, 523.25, 1.0);

        let mut split = OscillatorVoice::new(SAMPLE_RATE);
        let mut first = AudioBuffer::new(1, 117);
        let mut second = AudioBuffer::new(1, 183);
        split.render(&mut first, 523.25, 1.0);
        split.render(&mut second, 523.25, 1.0);

        assert_eq!(&single.channel(0)[..117], first.channel(0));
        assert_eq!(&single.channel(0)[117..], second.channel(0));
        assert_eq!(whole.phase(), split.phase());
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = OscillatorVoice::new(SAMPLE_RATE);
        let mut buf = AudioBuffer::new(1, 10_000);
        osc.render(&mut buf, 19_000.0, 1.0);
        assert!(osc.phase() >= 0.0 && osc.phase() < TAU);
    }

    #[test]
    fn increment_above_full_cycle_still_wraps() {
        // Frequency above the sample rate advances more than 2π per frame.
        let mut osc = OscillatorVoice::new(1000);
        let mut buf = AudioBuffer::new(1, 16);
        osc.render(&mut buf, 2500.0, 1.0);
        assert!(osc.phase() < TAU);
    }

    #[test]
    fn volume_scales_output() {
        let mut osc = OscillatorVoice::new(SAMPLE_RATE);
        let mut buf = AudioBuffer::new(1, 200);
        osc.render(&mut buf, 440.0, 0.0);
        assert_eq!(buf.peak(), 0.0);
    }

    #[test]
    fn mono_interleaved_output() {
        let mut osc = OscillatorVoice::new(SAMPLE_RATE);
        let mut data = [0.0f32; 8];
        osc.render(&mut Interleaved::new(&mut data, 1), 1000.0, 1.0);
        assert_eq!(data[0], 0.0);
        assert!((data[1] - expected(1000.0, 1.0, 1)).abs() < 1e-6);
    }

    #[test]
    fn reset_restarts_waveform() {
        let mut osc = OscillatorVoice::new(SAMPLE_RATE);
        let mut buf = AudioBuffer::new(1, 33);
        osc.render(&mut buf, 440.0, 1.0);
        assert!(osc.phase() > 0.0);
        osc.reset();
        assert_eq!(osc.phase(), 0.0);
    }
}
