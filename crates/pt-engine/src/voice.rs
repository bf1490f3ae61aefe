//! Voice: one-shot playback of a pad's sample.

use std::sync::Arc;

use pt_ir::{OutputBlock, Sample};

/// A single pad voice reading from shared, immutable PCM.
///
/// Cursor and active flag belong to the render thread; other threads only
/// request retriggers through [`crate::TriggerRequests`].
#[derive(Clone, Debug, Default)]
pub struct SampleVoice {
    /// Sample played by this voice, `None` for a silent pad.
    sample: Option<Arc<Sample>>,
    /// Next frame to read.
    cursor: usize,
    /// Is the voice currently producing audio?
    active: bool,
}

impl SampleVoice {
    /// Create a silent voice with no sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a voice for `sample`, idle until retriggered.
    pub fn with_sample(sample: Arc<Sample>) -> Self {
        Self {
            sample: Some(sample),
            cursor: 0,
            active: false,
        }
    }

    /// Replace the sample and stop playback. Setup phase only.
    pub fn load(&mut self, sample: Arc<Sample>) {
        self.sample = Some(sample);
        self.cursor = 0;
        self.active = false;
    }

    pub fn sample(&self) -> Option<&Sample> {
        self.sample.as_deref()
    }

    pub fn has_sample(&self) -> bool {
        self.sample.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Restart from the first frame. A voice without sample data stays idle.
    pub fn retrigger(&mut self) {
        self.cursor = 0;
        self.active = self.has_sample();
    }

    /// Sum up to one block of the sample into `out` at unity gain.
    ///
    /// Output channel `ch` reads sample plane `ch`; mono samples feed every
    /// channel and stereo samples feed extra channels from the right plane.
    pub fn render_into<B: OutputBlock + ?Sized>(&mut self, out: &mut B) {
        if !self.active {
            return;
        }
        let Some(sample) = self.sample.as_deref() else {
            self.active = false;
            return;
        };

        let len = sample.len();
        let count = len.saturating_sub(self.cursor).min(out.frames());
        let end = self.cursor + count;

        for ch in 0..out.channels() {
            let src = &sample.plane(ch)[self.cursor..end];
            for (frame, &value) in src.iter().enumerate() {
                out.add(ch, frame, value);
            }
        }

        self.cursor = end;
        if self.cursor >= len {
            self.active = false;
        }
    }
}
