//! Real-time engine for padtone.
//!
//! A sine oscillator driven by MIDI notes plus sixteen one-shot sample pads,
//! split across three threads: MIDI ingestion ([`MidiRouter`]), the control
//! surface ([`Controls`] and a [`NotificationReceiver`]) and the audio
//! callback ([`RenderEngine`]). All cross-thread state is atomic.

use std::sync::Arc;

use pt_ir::Sample;
use tracing::{debug, info};

mod config;
mod controls;
mod error;
pub mod frequency;
mod midi_router;
mod mixer;
mod note_state;
mod notify;
mod oscillator;
mod params;
mod shared;
mod trigger;
mod voice;
mod voice_pool;

pub use config::{
    EngineConfig, DEFAULT_NOTIFICATION_CAPACITY, DEFAULT_PAD_BASE_NOTE, DEFAULT_SAMPLE_RATE,
};
pub use controls::Controls;
pub use error::EngineError;
pub use frequency::note_to_frequency;
pub use midi_router::{parse_midi, MidiRouter, PadMap};
pub use mixer::RenderEngine;
pub use note_state::{NoteCell, NoteState};
pub use notify::{notification_channel, Notification, NotificationReceiver, NotificationSender};
pub use oscillator::OscillatorVoice;
pub use params::{ParamSnapshot, ParameterStore};
pub use shared::SharedState;
pub use trigger::{PadSet, TriggerRequests};
pub use voice::SampleVoice;
pub use voice_pool::SampleVoicePool;

/// Number of sample pads.
pub const PAD_COUNT: usize = 16;

/// The handles produced by [`build_engine`], one per thread role.
#[derive(Debug)]
pub struct EngineParts {
    pub controls: Controls,
    pub renderer: RenderEngine,
    pub router: MidiRouter,
    pub notifications: NotificationReceiver,
}

/// Validate `config`, load up to [`PAD_COUNT`] pad samples (in pad order,
/// `None` for a silent pad) and wire the engine together.
pub fn build_engine<I>(config: &EngineConfig, samples: I) -> Result<EngineParts, EngineError>
where
    I: IntoIterator<Item = Option<Sample>>,
{
    config.validate()?;

    let mut pool = SampleVoicePool::new();
    for (pad, sample) in samples.into_iter().enumerate() {
        let Some(sample) = sample else {
            continue;
        };
        if pad >= PAD_COUNT {
            debug!(pad, name = %sample.name, "Ignoring sample beyond the last pad.");
            continue;
        }
        debug!(pad, name = %sample.name, frames = sample.len(), "Loaded pad sample.");
        pool.load(pad, Arc::new(sample))?;
    }

    let shared = Arc::new(SharedState::new());
    let (tx, rx) = notification_channel(config.notification_capacity);
    let parts = EngineParts {
        controls: Controls::new(shared.clone()),
        renderer: RenderEngine::new(shared.clone(), pool, config.sample_rate),
        router: MidiRouter::new(shared, PadMap::new(config.pad_base_note), tx),
        notifications: rx,
    };
    info!(
        loaded = (0..PAD_COUNT).filter(|&p| parts.renderer.pool().is_loaded(p)).count(),
        sample_rate = config.sample_rate,
        "Engine built."
    );
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_invalid_config() {
        let config = EngineConfig {
            notification_capacity: 0,
            ..Default::default()
        };
        assert_eq!(
            build_engine(&config, std::iter::empty()).err(),
            Some(EngineError::InvalidCapacity)
        );
    }

    #[test]
    fn build_loads_samples_in_pad_order() {
        let samples = (0..PAD_COUNT + 2).map(|pad| {
            (pad % 2 == 0).then(|| Sample::from_mono("pad", vec![0.1; 8], 44100))
        });
        let parts = build_engine(&EngineConfig::default(), samples).unwrap();
        let pool = parts.renderer.pool();
        assert!(pool.is_loaded(0));
        assert!(!pool.is_loaded(1));
        assert!(pool.is_loaded(14));
        assert!(!pool.is_loaded(15));
    }

    #[test]
    fn parts_share_state() {
        let mut parts = build_engine(&EngineConfig::default(), std::iter::empty()).unwrap();
        parts.router.handle_raw(&[0x90, 36, 100]);
        assert_eq!(parts.controls.current_note(), Some(36));
        assert_eq!(
            parts.notifications.drain().collect::<Vec<_>>(),
            vec![
                Notification::PadTriggered { pad: 0 },
                Notification::NoteChanged { note: Some(36) },
            ]
        );
        let mut out = pt_ir::AudioBuffer::new(2, 32);
        parts.renderer.render(&mut out);
        assert!(out.peak() > 0.0);
    }
}
