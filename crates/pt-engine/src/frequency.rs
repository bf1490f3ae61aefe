//! Equal-temperament pitch conversion for the oscillator.
//!
//! MIDI note 69 is A4 at 440 Hz and each semitone is a factor of 2^(1/12).

use core::f64::consts::TAU;

/// The MIDI note number tuned to [`A4_FREQUENCY`].
pub const A4_NOTE: u8 = 69;

/// Reference pitch in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// Convert a MIDI note number to its frequency in Hz.
///
/// Every note, including 0 (about 8.18 Hz), maps to a positive frequency.
pub fn note_to_frequency(note: u8) -> f32 {
    let semitones = note as f32 - A4_NOTE as f32;
    A4_FREQUENCY * 2f32.powf(semitones / 12.0)
}

/// Frequency multiplier for a detune offset in semitones.
pub fn detune_ratio(semitones: f32) -> f32 {
    2f32.powf(semitones / 12.0)
}

/// Per-frame phase advance in radians for `frequency` at `sample_rate`.
///
/// Returns 0 for a zero sample rate.
pub fn phase_increment(frequency: f32, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    TAU * frequency as f64 / sample_rate as f64
}
