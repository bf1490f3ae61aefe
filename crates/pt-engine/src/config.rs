//! Engine configuration.

use tracing::debug;

use crate::error::EngineError;
use crate::PAD_COUNT;

/// MIDI note mapped to pad 0 unless configured otherwise (C2).
pub const DEFAULT_PAD_BASE_NOTE: u8 = 36;

/// Default notification queue depth, well above realistic note bursts.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 256;

/// Sample rate used before a device configures the engine.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Settings fixed at engine construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// MIDI note that triggers pad 0; pads follow chromatically.
    pub pad_base_note: u8,
    /// Depth of the notification queue towards the control surface.
    pub notification_capacity: usize,
    /// Initial render rate; devices override it through `configure`.
    pub sample_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pad_base_note: DEFAULT_PAD_BASE_NOTE,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl EngineConfig {
    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate);
        }
        if self.notification_capacity == 0 {
            return Err(EngineError::InvalidCapacity);
        }
        if self.pad_base_note as usize + PAD_COUNT > 128 {
            return Err(EngineError::InvalidPadBaseNote {
                base: self.pad_base_note,
            });
        }
        debug!(
            pad_base_note = self.pad_base_note,
            notification_capacity = self.notification_capacity,
            sample_rate = self.sample_rate,
            "Engine configuration accepted."
        );
        Ok(())
    }
}
