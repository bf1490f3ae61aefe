//! Core value types for padtone.
//!
//! This crate defines the data shared by the render engine, the sample
//! loaders and the device backends: output blocks, decoded samples,
//! parameter definitions and MIDI note events.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod audio_buffer;
mod audio_traits;
mod midi;
mod param;
mod sample;

pub use audio_buffer::{AudioBuffer, Interleaved, MAX_CHANNELS};
pub use audio_traits::OutputBlock;
pub use midi::MidiEvent;
pub use param::{ParamId, ParamRange, UnknownParam};
pub use sample::{Sample, SampleData};
