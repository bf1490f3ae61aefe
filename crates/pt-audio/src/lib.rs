//! Audio output and MIDI input backends for padtone.

mod cpal_backend;
mod midi_input;
mod traits;

pub use cpal_backend::CpalOutput;
pub use midi_input::{
    connect_midi_input, list_midi_inputs, select_port, MidiConnection, MidiPortSelector,
};
pub use traits::{AudioError, AudioOutput};
