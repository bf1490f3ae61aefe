//! MidiRouter: turns note events into note state, pad triggers and
//! notifications on the MIDI ingestion thread.

use std::sync::Arc;

use midly::live::LiveEvent;
use midly::MidiMessage;
use pt_ir::MidiEvent;
use tracing::trace;

use crate::notify::{Notification, NotificationSender};
use crate::shared::SharedState;
use crate::PAD_COUNT;

/// Maps a run of [`PAD_COUNT`] consecutive notes onto pads 0..PAD_COUNT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadMap {
    base_note: u8,
}

impl PadMap {
    pub fn new(base_note: u8) -> Self {
        Self { base_note }
    }

    pub fn base_note(&self) -> u8 {
        self.base_note
    }

    /// Pad played by `note`, if the note falls inside the table.
    pub fn pad_for_note(&self, note: u8) -> Option<usize> {
        let pad = note.checked_sub(self.base_note)? as usize;
        (pad < PAD_COUNT).then_some(pad)
    }

    /// Note that plays `pad`, if both exist.
    pub fn note_for_pad(&self, pad: usize) -> Option<u8> {
        if pad >= PAD_COUNT {
            return None;
        }
        let note = self.base_note as usize + pad;
        (note < 128).then_some(note as u8)
    }
}

/// Decode raw MIDI bytes into a note event. Anything that is not a note
/// message (or fails to parse) yields `None`.
pub fn parse_midi(raw: &[u8]) -> Option<MidiEvent> {
    match LiveEvent::parse(raw).ok()? {
        LiveEvent::Midi { channel, message } => {
            let channel = u8::from(channel);
            match message {
                MidiMessage::NoteOn { key, vel } => {
                    Some(MidiEvent::note_on(channel, u8::from(key), u8::from(vel)))
                }
                MidiMessage::NoteOff { key, .. } => Some(MidiEvent::NoteOff {
                    channel,
                    note: u8::from(key),
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Routes note events from the MIDI thread into the engine.
///
/// Per event the work is one note-state update, at most one trigger bit and
/// at most two non-blocking posts, so a slow consumer never stalls input.
#[derive(Clone, Debug)]
pub struct MidiRouter {
    shared: Arc<SharedState>,
    pads: PadMap,
    notifications: NotificationSender,
}

impl MidiRouter {
    pub fn new(shared: Arc<SharedState>, pads: PadMap, notifications: NotificationSender) -> Self {
        Self {
            shared,
            pads,
            notifications,
        }
    }

    pub fn pad_map(&self) -> PadMap {
        self.pads
    }

    /// Parse and route one raw MIDI message.
    pub fn handle_raw(&self, raw: &[u8]) {
        match parse_midi(raw) {
            Some(event) => self.handle(event),
            None => trace!(len = raw.len(), "Ignoring non-note MIDI message."),
        }
    }

    /// Route one note event.
    pub fn handle(&self, event: MidiEvent) {
        if event.note() > 127 {
            trace!(note = event.note(), "Ignoring note outside the MIDI range.");
            return;
        }
        match event {
            MidiEvent::NoteOn { note, velocity, .. } if velocity > 0 => {
                let state = self.shared.note.note_on(note);
                trace!(note, velocity, frequency = state.base_frequency, "Note on.");
                if let Some(pad) = self.pads.pad_for_note(note) {
                    // pad_for_note only yields indices below PAD_COUNT.
                    if self.shared.triggers.request(pad).is_ok() {
                        self.notifications.post(Notification::PadTriggered { pad });
                    }
                }
                self.notifications
                    .post(Notification::NoteChanged { note: Some(note) });
            }
            MidiEvent::NoteOn { note, .. } | MidiEvent::NoteOff { note, .. } => {
                if self.shared.note.note_off(note) {
                    trace!(note, "Note off.");
                    self.notifications.post(Notification::NoteChanged { note: None });
                } else {
                    trace!(note, "Ignoring note off for a note that is not held.");
                }
            }
        }
    }
}
