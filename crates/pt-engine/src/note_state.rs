//! Held-note state shared by the MIDI, control and render threads.
//!
//! Note number, base frequency and the playing flag live in one packed
//! 64-bit word so every reader sees a consistent triple. Writers go through
//! a compare-exchange loop, which also lets note-off check the held note
//! and clear it in a single step.
//!
//! Layout (LSB first): 32 bits frequency (f32 bits), 8 bits note
//! (`0xFF` = none), 1 bit playing, 23 bits version.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::frequency::{note_to_frequency, A4_FREQUENCY};

const FREQ_MASK: u64 = 0xFFFF_FFFF;
const NOTE_SHIFT: u32 = 32;
const NO_NOTE: u8 = 0xFF;
const PLAYING_BIT: u64 = 1 << 40;
const VERSION_SHIFT: u32 = 41;
const VERSION_MASK: u32 = (1 << 23) - 1;

/// A consistent snapshot of the oscillator's note state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteState {
    /// The MIDI note currently held, if any.
    pub held_note: Option<u8>,
    /// Frequency of the held (or last held) note in Hz.
    pub base_frequency: f32,
    /// Whether the oscillator is sounding.
    pub playing: bool,
    /// Incremented on every committed change (wraps at 23 bits).
    pub version: u32,
}

impl NoteState {
    fn silent() -> Self {
        Self {
            held_note: None,
            base_frequency: A4_FREQUENCY,
            playing: false,
            version: 0,
        }
    }
}

fn pack(state: NoteState) -> u64 {
    let freq = state.base_frequency.to_bits() as u64;
    let note = state.held_note.unwrap_or(NO_NOTE) as u64;
    let playing = if state.playing { PLAYING_BIT } else { 0 };
    let version = (state.version & VERSION_MASK) as u64;
    freq | (note << NOTE_SHIFT) | playing | (version << VERSION_SHIFT)
}

fn unpack(bits: u64) -> NoteState {
    let note = ((bits >> NOTE_SHIFT) & 0xFF) as u8;
    NoteState {
        held_note: (note != NO_NOTE).then_some(note),
        base_frequency: f32::from_bits((bits & FREQ_MASK) as u32),
        playing: bits & PLAYING_BIT != 0,
        version: (bits >> VERSION_SHIFT) as u32 & VERSION_MASK,
    }
}

/// Single-word atomic cell holding a [`NoteState`].
#[derive(Debug)]
pub struct NoteCell {
    bits: AtomicU64,
}

impl NoteCell {
    /// Silent, no note held, base frequency 440 Hz.
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(pack(NoteState::silent())),
        }
    }

    /// Read the current state.
    pub fn load(&self) -> NoteState {
        unpack(self.bits.load(Ordering::Acquire))
    }

    /// Hold `note`, set its frequency and start sounding, in one store.
    pub fn note_on(&self, note: u8) -> NoteState {
        debug_assert!(note < NO_NOTE, "note {note} collides with the empty marker");
        let frequency = note_to_frequency(note);
        self.update(|_| {
            Some(NoteState {
                held_note: Some(note),
                base_frequency: frequency,
                playing: true,
                version: 0,
            })
        })
        .unwrap_or_else(|| self.load())
    }

    /// Release `note` if it is the held note. Returns false (and changes
    /// nothing) when a different note or no note is held.
    pub fn note_off(&self, note: u8) -> bool {
        self.update(|state| {
            (state.held_note == Some(note)).then_some(NoteState {
                held_note: None,
                playing: false,
                ..state
            })
        })
        .is_some()
    }

    /// Start sounding at the current base frequency, keeping the held note.
    pub fn play(&self) -> NoteState {
        self.update(|state| Some(NoteState { playing: true, ..state }))
            .unwrap_or_else(|| self.load())
    }

    /// Stop sounding and forget the held note.
    pub fn stop(&self) -> NoteState {
        self.update(|state| {
            Some(NoteState {
                held_note: None,
                playing: false,
                ..state
            })
        })
        .unwrap_or_else(|| self.load())
    }

    /// Flip between playing and stopped. Returns the new playing flag.
    pub fn toggle(&self) -> bool {
        self.update(|state| {
            Some(if state.playing {
                NoteState {
                    held_note: None,
                    playing: false,
                    ..state
                }
            } else {
                NoteState { playing: true, ..state }
            })
        })
        .map_or_else(|| self.load().playing, |state| state.playing)
    }

    /// Apply `f` to the current state and commit its result with a bumped
    /// version. `None` from `f` leaves the cell untouched.
    fn update(&self, mut f: impl FnMut(NoteState) -> Option<NoteState>) -> Option<NoteState> {
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let state = unpack(current);
            let mut next = f(state)?;
            next.version = state.version.wrapping_add(1) & VERSION_MASK;
            match self.bits.compare_exchange_weak(
                current,
                pack(next),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(next),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for NoteCell {
    fn default() -> Self {
        Self::new()
    }
}
