//! State reachable from every thread.

use crate::note_state::NoteCell;
use crate::params::ParameterStore;
use crate::trigger::TriggerRequests;

/// Lock-free state shared by the MIDI, control and render threads.
///
/// Everything here is atomic; the render thread only ever loads from it,
/// apart from taking pending triggers.
#[derive(Debug, Default)]
pub struct SharedState {
    pub params: ParameterStore,
    pub note: NoteCell,
    pub triggers: TriggerRequests,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }
}
