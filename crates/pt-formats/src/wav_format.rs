//! WAV encoding and decoding for PCM audio.

use crate::FormatError;
use pt_ir::{AudioBuffer, Sample};
use std::io::Write;

const FORMAT_PCM: u16 = 1;
const FORMAT_FLOAT: u16 = 3;

// --- Writing ---

/// Write `buffer` as 16-bit stereo PCM. Mono buffers are duplicated to both
/// sides; channels past the second are dropped.
pub fn write_wav(w: &mut impl Write, buffer: &AudioBuffer, sample_rate: u32) -> std::io::Result<()> {
    let num_channels: u16 = 2;
    let bits_per_sample: u16 = 16;
    let block_align = num_channels * (bits_per_sample / 8);
    let data_size = buffer.frames() as u32 * block_align as u32;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, num_channels, sample_rate, block_align, bits_per_sample)?;
    write_data_chunk(w, buffer, data_size)
}

pub fn buffer_to_wav(buffer: &AudioBuffer, sample_rate: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(44 + buffer.frames() * 4);
    write_wav(&mut buf, buffer, sample_rate).expect("Vec<u8> write cannot fail");
    buf
}

fn write_riff_header(w: &mut impl Write, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")
}

fn write_fmt_chunk(
    w: &mut impl Write,
    num_channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
) -> std::io::Result<()> {
    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&FORMAT_PCM.to_le_bytes())?;
    w.write_all(&num_channels.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * block_align as u32).to_le_bytes())?;
    w.write_all(&block_align.to_le_bytes())?;
    w.write_all(&bits_per_sample.to_le_bytes())
}

fn write_data_chunk(w: &mut impl Write, buffer: &AudioBuffer, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    if buffer.channels() == 0 {
        for _ in 0..buffer.frames() {
            w.write_all(&[0; 4])?;
        }
        return Ok(());
    }
    let left = buffer.channel(0);
    let right = buffer.channel(buffer.channels().min(2) - 1);
    for (&l, &r) in left.iter().zip(right) {
        w.write_all(&to_i16(l).to_le_bytes())?;
        w.write_all(&to_i16(r).to_le_bytes())?;
    }
    Ok(())
}

fn to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

// --- Reading ---

/// Load a WAV file from raw bytes into a Sample.
///
/// Handles 8-bit unsigned and 16-bit signed PCM plus 32-bit float, mono or
/// stereo. Integer PCM is scaled into [-1.0, 1.0).
pub fn load_wav(data: &[u8], name: &str) -> Result<Sample, FormatError> {
    let header = parse_header(data)?;
    let end = header.data_offset.saturating_add(header.data_size).min(data.len());
    let raw = &data[header.data_offset..end];
    let interleaved = decode_samples(raw, &header);
    Ok(Sample::from_interleaved(
        name,
        &interleaved,
        header.num_channels as usize,
        header.sample_rate,
    ))
}

struct WavHeader {
    format: u16,
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    data_offset: usize,
    data_size: usize,
}

fn parse_header(data: &[u8]) -> Result<WavHeader, FormatError> {
    if data.len() < 12 {
        return Err(FormatError::UnexpectedEof);
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(FormatError::InvalidHeader);
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u16, u32, u16)> = None;
    let mut data_chunk: Option<(usize, usize)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32_le(data, pos + 4) as usize;

        if chunk_id == b"fmt " {
            if chunk_size < 16 {
                return Err(FormatError::InvalidHeader);
            }
            if pos + 8 + 16 > data.len() {
                return Err(FormatError::UnexpectedEof);
            }
            let format = read_u16_le(data, pos + 8);
            let channels = read_u16_le(data, pos + 10);
            let rate = read_u32_le(data, pos + 12);
            let bits = read_u16_le(data, pos + 22);
            fmt = Some((format, channels, rate, bits));
        } else if chunk_id == b"data" {
            data_chunk = Some((pos + 8, chunk_size));
        }

        pos = pos.saturating_add(8).saturating_add(chunk_size);
        if pos % 2 != 0 {
            pos = pos.saturating_add(1);
        }
    }

    let (format, num_channels, sample_rate, bits_per_sample) = fmt.ok_or(FormatError::InvalidHeader)?;
    let (data_offset, data_size) = data_chunk.ok_or(FormatError::UnexpectedEof)?;

    let supported = matches!(
        (format, bits_per_sample),
        (FORMAT_PCM, 8) | (FORMAT_PCM, 16) | (FORMAT_FLOAT, 32)
    );
    if !supported || !(1..=2).contains(&num_channels) {
        return Err(FormatError::Unsupported {
            format,
            bits: bits_per_sample,
            channels: num_channels,
        });
    }
    if sample_rate == 0 {
        return Err(FormatError::InvalidHeader);
    }

    Ok(WavHeader {
        format,
        num_channels,
        sample_rate,
        bits_per_sample,
        data_offset,
        data_size,
    })
}

/// Decode interleaved samples to f32. A trailing partial sample is dropped.
fn decode_samples(raw: &[u8], header: &WavHeader) -> Vec<f32> {
    match (header.format, header.bits_per_sample) {
        // WAV 8-bit is unsigned 0-255, center=128.
        (FORMAT_PCM, 8) => raw.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect(),
        (FORMAT_PCM, 16) => raw
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32 / 32768.0)
            .collect(),
        _ => raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    }
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
