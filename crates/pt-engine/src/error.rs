//! Engine error type.

use crate::PAD_COUNT;

/// Errors raised at the engine's non-real-time boundaries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("pad index {pad} out of range (0..{})", PAD_COUNT)]
    PadOutOfRange { pad: usize },

    #[error("sample rate must be non-zero")]
    InvalidSampleRate,

    #[error("render engine already configured at {sample_rate} Hz")]
    AlreadyConfigured { sample_rate: u32 },

    #[error("notification capacity must be non-zero")]
    InvalidCapacity,

    #[error("pad base note {base} leaves no room for {} pads below note 128", PAD_COUNT)]
    InvalidPadBaseNote { base: u8 },
}
