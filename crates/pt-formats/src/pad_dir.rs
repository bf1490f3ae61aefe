//! Pad sample discovery.
//!
//! A samples directory holds `pad_0.wav` through `pad_15.wav`. Any of them
//! may be absent or unreadable; that pad is simply silent.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use pt_engine::PAD_COUNT;
use pt_ir::Sample;
use tracing::{debug, info, warn};

use crate::wav_format::load_wav;
use crate::FormatError;

/// File name holding the sample for `pad`.
pub fn pad_file_name(pad: usize) -> String {
    format!("pad_{pad}.wav")
}

/// Load every pad's sample from `dir`, in pad order.
///
/// Only a missing directory is an error. Missing files are logged at debug
/// level and undecodable ones as warnings; both leave the pad empty.
pub fn load_pad_samples(dir: &Path) -> Result<Vec<Option<Sample>>, FormatError> {
    if !dir.is_dir() {
        return Err(FormatError::MissingDirectory(dir.to_path_buf()));
    }

    let samples: Vec<Option<Sample>> = (0..PAD_COUNT).map(|pad| load_pad(dir, pad)).collect();
    info!(
        dir = %dir.display(),
        loaded = samples.iter().filter(|s| s.is_some()).count(),
        "Loaded pad samples."
    );
    Ok(samples)
}

fn load_pad(dir: &Path, pad: usize) -> Option<Sample> {
    let path = dir.join(pad_file_name(pad));
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(pad, path = %path.display(), "No sample for pad.");
            return None;
        }
        Err(e) => {
            warn!(pad, path = %path.display(), err = %e, "Unable to read pad sample.");
            return None;
        }
    };

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    match load_wav(&bytes, &name) {
        Ok(sample) => {
            debug!(
                pad,
                frames = sample.len(),
                channels = sample.channel_count(),
                sample_rate = sample.sample_rate,
                "Decoded pad sample."
            );
            Some(sample)
        }
        Err(e) => {
            warn!(pad, path = %path.display(), err = %e, "Unable to decode pad sample.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav_format::buffer_to_wav;
    use pt_ir::AudioBuffer;

    fn write_pad(dir: &Path, pad: usize, frames: usize) {
        let mut buffer = AudioBuffer::new(2, frames);
        buffer.channel_mut(0).fill(0.25);
        fs::write(dir.join(pad_file_name(pad)), buffer_to_wav(&buffer, 44100)).unwrap();
    }

    #[test]
    fn loads_present_pads_only() {
        let dir = tempfile::tempdir().unwrap();
        write_pad(dir.path(), 0, 10);
        write_pad(dir.path(), 15, 20);

        let samples = load_pad_samples(dir.path()).unwrap();
        assert_eq!(samples.len(), PAD_COUNT);
        assert_eq!(samples[0].as_ref().map(Sample::len), Some(10));
        assert_eq!(samples[15].as_ref().map(Sample::len), Some(20));
        assert_eq!(samples[0].as_ref().unwrap().name.as_str(), "pad_0");
        assert!(samples[1..15].iter().all(Option::is_none));
    }

    #[test]
    fn undecodable_file_leaves_pad_silent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(pad_file_name(3)), b"garbage").unwrap();
        write_pad(dir.path(), 4, 5);

        let samples = load_pad_samples(dir.path()).unwrap();
        assert!(samples[3].is_none());
        assert!(samples[4].is_some());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_pad_samples(&missing),
            Err(FormatError::MissingDirectory(p)) if p == missing
        ));
    }
}
