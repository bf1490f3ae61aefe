//! RenderEngine: produces one output block per audio callback.

use std::sync::Arc;

use pt_ir::{Interleaved, OutputBlock};
use tracing::info;

use crate::error::EngineError;
use crate::frequency::detune_ratio;
use crate::oscillator::OscillatorVoice;
use crate::shared::SharedState;
use crate::voice_pool::SampleVoicePool;

/// The render-thread half of the engine.
///
/// Owns the oscillator phase and every voice cursor; reads parameters and
/// note state through atomics and drains trigger requests once per block.
/// [`RenderEngine::render`] never allocates, locks, logs or touches I/O.
#[derive(Debug)]
pub struct RenderEngine {
    shared: Arc<SharedState>,
    oscillator: OscillatorVoice,
    pool: SampleVoicePool,
    sample_rate: u32,
    configured: bool,
}

impl RenderEngine {
    pub fn new(shared: Arc<SharedState>, pool: SampleVoicePool, sample_rate: u32) -> Self {
        Self {
            shared,
            oscillator: OscillatorVoice::new(sample_rate),
            pool,
            sample_rate,
            configured: false,
        }
    }

    /// Fix the sample rate before the first block. Called once by the device;
    /// the rate cannot change after a successful call.
    pub fn configure(&mut self, sample_rate: u32) -> Result<(), EngineError> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate);
        }
        if self.configured {
            return Err(EngineError::AlreadyConfigured {
                sample_rate: self.sample_rate,
            });
        }
        self.configured = true;
        self.sample_rate = sample_rate;
        self.oscillator.set_sample_rate(sample_rate);
        info!(sample_rate, "Render engine configured.");
        Ok(())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn oscillator(&self) -> &OscillatorVoice {
        &self.oscillator
    }

    pub fn pool(&self) -> &SampleVoicePool {
        &self.pool
    }

    /// Render one block into `out`, overwriting whatever it held.
    pub fn render<B: OutputBlock + ?Sized>(&mut self, out: &mut B) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.render_block(out));
        #[cfg(not(feature = "alloc_check"))]
        self.render_block(out);
    }

    /// Render into an interleaved device buffer with `channels` channels.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.render(&mut Interleaved::new(data, channels));
    }

    fn render_block<B: OutputBlock + ?Sized>(&mut self, out: &mut B) {
        out.clear();

        let note = self.shared.note.load();
        if note.playing {
            let params = self.shared.params.snapshot();
            let frequency = note.base_frequency * detune_ratio(params.detune);
            self.oscillator.render(out, frequency, params.volume);
        }

        self.pool.apply_triggers(self.shared.triggers.take());
        self.pool.render_all(out);
    }
}
