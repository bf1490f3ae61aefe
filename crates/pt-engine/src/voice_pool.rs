//! SampleVoicePool: one voice per pad, mixed additively.

use std::sync::Arc;

use pt_ir::{OutputBlock, Sample};

use crate::error::EngineError;
use crate::trigger::PadSet;
use crate::voice::SampleVoice;
use crate::PAD_COUNT;

/// Fixed bank of pad voices, owned by the render thread.
///
/// Pads never steal from each other: each pad has its own slot, so a
/// retrigger only restarts that pad.
#[derive(Clone, Debug)]
pub struct SampleVoicePool {
    voices: [SampleVoice; PAD_COUNT],
}

impl SampleVoicePool {
    /// Create a pool of silent pads.
    pub fn new() -> Self {
        Self {
            voices: core::array::from_fn(|_| SampleVoice::new()),
        }
    }

    /// Assign `sample` to `pad`. Setup phase only.
    pub fn load(&mut self, pad: usize, sample: Arc<Sample>) -> Result<(), EngineError> {
        let voice = self
            .voices
            .get_mut(pad)
            .ok_or(EngineError::PadOutOfRange { pad })?;
        voice.load(sample);
        Ok(())
    }

    /// Whether `pad` has sample data to play.
    pub fn is_loaded(&self, pad: usize) -> bool {
        self.voices.get(pad).is_some_and(SampleVoice::has_sample)
    }

    pub fn get(&self, pad: usize) -> Option<&SampleVoice> {
        self.voices.get(pad)
    }

    /// Restart every pad in `pads`.
    pub fn apply_triggers(&mut self, pads: PadSet) {
        for pad in pads {
            self.voices[pad].retrigger();
        }
    }

    /// Sum every active voice into `out`.
    pub fn render_all<B: OutputBlock + ?Sized>(&mut self, out: &mut B) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.render_into(out);
        }
    }

    /// Number of voices currently sounding.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }
}

impl Default for SampleVoicePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerRequests;
    use pt_ir::AudioBuffer;

    fn constant(value: f32, len: usize) -> Arc<Sample> {
        Arc::new(Sample::from_mono("const", vec![value; len], 44100))
    }

    fn trigger(pads: &[usize]) -> PadSet {
        let requests = TriggerRequests::new();
        for &pad in pads {
            requests.request(pad).unwrap();
        }
        requests.take()
    }

    #[test]
    fn new_pool_is_silent() {
        let mut pool = SampleVoicePool::new();
        let mut buf = AudioBuffer::new(2, 16);
        pool.apply_triggers(trigger(&[0, 5, 15]));
        pool.render_all(&mut buf);
        assert_eq!(buf.peak(), 0.0);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn load_rejects_out_of_range_pad() {
        let mut pool = SampleVoicePool::new();
        assert_eq!(
            pool.load(PAD_COUNT, constant(0.1, 4)),
            Err(EngineError::PadOutOfRange { pad: PAD_COUNT })
        );
        assert!(!pool.is_loaded(PAD_COUNT));
    }

    #[test]
    fn voices_superpose() {
        let mut pool = SampleVoicePool::new();
        pool.load(0, constant(0.25, 8)).unwrap();
        pool.load(1, constant(0.5, 8)).unwrap();
        pool.apply_triggers(trigger(&[0, 1]));
        assert_eq!(pool.active_count(), 2);

        let mut buf = AudioBuffer::new(1, 4);
        pool.render_all(&mut buf);
        assert_eq!(buf.channel(0), &[0.75; 4]);
    }

    #[test]
    fn untriggered_pads_stay_quiet() {
        let mut pool = SampleVoicePool::new();
        pool.load(2, constant(0.5, 8)).unwrap();
        pool.load(3, constant(0.25, 8)).unwrap();
        pool.apply_triggers(trigger(&[3]));

        let mut buf = AudioBuffer::new(1, 4);
        pool.render_all(&mut buf);
        assert_eq!(buf.channel(0), &[0.25; 4]);
        assert!(!pool.get(2).unwrap().is_active());
    }

    #[test]
    fn finished_voices_drop_out() {
        let mut pool = SampleVoicePool::new();
        pool.load(4, constant(0.5, 3)).unwrap();
        pool.apply_triggers(trigger(&[4]));

        let mut buf = AudioBuffer::new(1, 8);
        pool.render_all(&mut buf);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(&buf.channel(0)[3..], &[0.0; 5]);
    }
}
