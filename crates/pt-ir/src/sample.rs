//! Decoded sample data.

use alloc::vec::Vec;
use arrayvec::ArrayString;

/// A decoded, immutable PCM sample assigned to a drum pad.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Sample name (usually the file stem)
    pub name: ArrayString<32>,
    /// Audio data, planar f32 in [-1.0, 1.0]
    pub data: SampleData,
    /// Rate the data was recorded at, in Hz
    pub sample_rate: u32,
}

impl Sample {
    /// Create a sample from planar data. Names longer than 32 bytes are truncated.
    pub fn new(name: &str, data: SampleData, sample_rate: u32) -> Self {
        let mut short = ArrayString::new();
        for c in name.chars() {
            if short.try_push(c).is_err() {
                break;
            }
        }
        Self {
            name: short,
            data,
            sample_rate,
        }
    }

    /// Create a mono sample.
    pub fn from_mono(name: &str, data: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(name, SampleData::Mono(data), sample_rate)
    }

    /// Create a stereo sample from left and right planes.
    ///
    /// The longer plane is truncated so both have the same length.
    pub fn from_stereo(name: &str, mut left: Vec<f32>, mut right: Vec<f32>, sample_rate: u32) -> Self {
        let len = left.len().min(right.len());
        left.truncate(len);
        right.truncate(len);
        Self::new(name, SampleData::Stereo(left, right), sample_rate)
    }

    /// Create a sample from interleaved data with one or two channels.
    ///
    /// Extra channels beyond two are dropped.
    pub fn from_interleaved(name: &str, data: &[f32], channels: usize, sample_rate: u32) -> Self {
        match channels {
            0 => Self::from_mono(name, Vec::new(), sample_rate),
            1 => Self::from_mono(name, data.to_vec(), sample_rate),
            n => {
                let frames = data.len() / n;
                let mut left = Vec::with_capacity(frames);
                let mut right = Vec::with_capacity(frames);
                for chunk in data.chunks_exact(n) {
                    left.push(chunk[0]);
                    right.push(chunk[1]);
                }
                Self::from_stereo(name, left, right, sample_rate)
            }
        }
    }

    /// Length in frames.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the sample has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of channels in the sample data.
    pub fn channel_count(&self) -> usize {
        self.data.channel_count()
    }

    /// One channel plane. Channels past the last plane read the last plane.
    pub fn plane(&self, ch: usize) -> &[f32] {
        self.data.plane(ch)
    }

    /// Read one value; out-of-range frames read as silence.
    pub fn read(&self, ch: usize, frame: usize) -> f32 {
        self.plane(ch).get(frame).copied().unwrap_or(0.0)
    }
}

/// Sample audio data.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleData {
    /// Mono samples
    Mono(Vec<f32>),
    /// Stereo samples (left, right), equal length
    Stereo(Vec<f32>, Vec<f32>),
}

impl SampleData {
    /// Get the number of sample frames.
    pub fn len(&self) -> usize {
        match self {
            SampleData::Mono(v) => v.len(),
            SampleData::Stereo(l, _) => l.len(),
        }
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels in the sample data.
    pub fn channel_count(&self) -> usize {
        match self {
            SampleData::Mono(_) => 1,
            SampleData::Stereo(_, _) => 2,
        }
    }

    /// One channel plane; mono data answers for every channel and stereo
    /// data answers channels past 1 with the right plane.
    pub fn plane(&self, ch: usize) -> &[f32] {
        match self {
            SampleData::Mono(v) => v,
            SampleData::Stereo(l, _) if ch == 0 => l,
            SampleData::Stereo(_, r) => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn long_names_are_truncated() {
        let name = "a-very-long-sample-name-that-goes-past-the-limit";
        let s = Sample::from_mono(name, vec![0.0], 44100);
        assert_eq!(s.name.len(), 32);
        assert!(name.starts_with(s.name.as_str()));
    }

    #[test]
    fn mono_answers_every_channel() {
        let s = Sample::from_mono("kick", vec![0.5, -0.5], 44100);
        assert_eq!(s.channel_count(), 1);
        assert_eq!(s.read(0, 1), -0.5);
        assert_eq!(s.read(1, 1), -0.5);
        assert_eq!(s.read(5, 0), 0.5);
    }

    #[test]
    fn stereo_planes_are_separate() {
        let s = Sample::from_stereo("hat", vec![1.0, 2.0, 3.0], vec![-1.0, -2.0], 48000);
        assert_eq!(s.len(), 2);
        assert_eq!(s.read(0, 1), 2.0);
        assert_eq!(s.read(1, 1), -2.0);
        assert_eq!(s.read(2, 0), -1.0);
    }

    #[test]
    fn read_past_end_is_silent() {
        let s = Sample::from_mono("snare", vec![0.25], 44100);
        assert_eq!(s.read(0, 10), 0.0);
    }

    #[test]
    fn from_interleaved_splits_planes() {
        let s = Sample::from_interleaved("clap", &[0.1, -0.1, 0.2, -0.2, 0.3], 2, 44100);
        assert_eq!(s.len(), 2);
        assert_eq!(s.plane(0), &[0.1, 0.2]);
        assert_eq!(s.plane(1), &[-0.1, -0.2]);
    }

    #[test]
    fn empty_sample_reports_empty() {
        let s = Sample::from_interleaved("none", &[], 0, 44100);
        assert!(s.is_empty());
    }
}
