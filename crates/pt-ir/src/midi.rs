//! MIDI note events consumed by the engine.

/// A channel voice message the engine reacts to.
///
/// Note-on with velocity 0 is a note-off by MIDI convention; build events
/// with [`MidiEvent::note_on`] to get that normalisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
}

impl MidiEvent {
    /// Build a note-on, mapping velocity 0 to a note-off.
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        if velocity == 0 {
            MidiEvent::NoteOff { channel, note }
        } else {
            MidiEvent::NoteOn {
                channel,
                note,
                velocity,
            }
        }
    }

    /// The note number carried by the event.
    pub fn note(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { note, .. } | MidiEvent::NoteOff { note, .. } => note,
        }
    }

    /// The 0-based MIDI channel.
    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }
}
