//! Controls: the control surface's handle on the engine.

use std::sync::Arc;

use pt_ir::ParamId;
use tracing::debug;

use crate::error::EngineError;
use crate::note_state::NoteState;
use crate::params::ParamSnapshot;
use crate::shared::SharedState;

/// Cheap, cloneable handle for parameter writes, manual play/stop and pad
/// triggers. Every call is a handful of atomic operations.
#[derive(Clone, Debug)]
pub struct Controls {
    shared: Arc<SharedState>,
}

impl Controls {
    pub fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Store a parameter, clamped into its range. Returns the stored value.
    pub fn set_param(&self, id: ParamId, value: f32) -> f32 {
        let stored = self.shared.params.set(id, value);
        debug!(param = %id, requested = value, stored, "Parameter set.");
        stored
    }

    pub fn param(&self, id: ParamId) -> f32 {
        self.shared.params.get(id)
    }

    pub fn params(&self) -> ParamSnapshot {
        self.shared.params.snapshot()
    }

    /// Start the oscillator at its current base frequency.
    pub fn play(&self) {
        let state = self.shared.note.play();
        debug!(frequency = state.base_frequency, "Manual play.");
    }

    /// Silence the oscillator and forget the held note.
    pub fn stop(&self) {
        self.shared.note.stop();
        debug!("Manual stop.");
    }

    /// Flip play/stop. Returns whether the oscillator is now playing.
    pub fn toggle_playing(&self) -> bool {
        let playing = self.shared.note.toggle();
        debug!(playing, "Playback toggled.");
        playing
    }

    pub fn note_state(&self) -> NoteState {
        self.shared.note.load()
    }

    pub fn current_note(&self) -> Option<u8> {
        self.note_state().held_note
    }

    pub fn is_playing(&self) -> bool {
        self.note_state().playing
    }

    /// Ask the render thread to restart `pad`. Invalid pads are rejected
    /// without side effects.
    pub fn request_trigger(&self, pad: usize) -> Result<(), EngineError> {
        self.shared.triggers.request(pad)?;
        debug!(pad, "Pad trigger requested.");
        Ok(())
    }
}
