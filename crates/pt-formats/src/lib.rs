//! Sample formats for padtone.
//!
//! Decodes WAV files into [`pt_ir::Sample`]s, discovers the pad samples in a
//! directory and encodes rendered audio back to WAV.

mod pad_dir;
mod wav_format;

pub use pad_dir::{load_pad_samples, pad_file_name};
pub use wav_format::{buffer_to_wav, load_wav, write_wav};

use std::path::PathBuf;

/// Error type for format parsing and sample discovery.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Invalid file header or magic bytes
    #[error("invalid WAV header")]
    InvalidHeader,
    /// Unexpected end of file
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// A valid WAV the decoder does not handle
    #[error("unsupported WAV encoding: format {format}, {bits} bits, {channels} channels")]
    Unsupported { format: u16, bits: u16, channels: u16 },
    /// Sample directory does not exist
    #[error("sample directory {0} not found")]
    MissingDirectory(PathBuf),
}
