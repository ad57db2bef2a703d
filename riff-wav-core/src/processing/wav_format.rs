//! RIFF-WAV layout constants and the fixed 44-byte header.
//!
//! The writer always emits exactly one 16-byte `fmt ` chunk followed by
//! `data`, so both size fields live at fixed offsets.

use crate::models::config::WriterConfig;
use crate::processing::byte_codec::{encode16, encode32, ByteOrder};

/// Size of the header emitted by the writer, in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Offset of the RIFF chunk size (file size - 8).
pub const RIFF_SIZE_OFFSET: u64 = 4;

/// Offset of the `data` chunk size.
pub const DATA_SIZE_OFFSET: u64 = 40;

/// Bytes of `fmt ` payload that are decoded; anything beyond is skipped.
pub const FMT_CORE_SIZE: u32 = 16;

/// `RIFF` tag plus its size field.
pub const RIFF_PREAMBLE_SIZE: u64 = 8;

pub const RIFF_TAG: &[u8; 4] = b"RIFF";
pub const WAVE_TAG: &[u8; 4] = b"WAVE";
pub const FMT_TAG: &[u8; 4] = b"fmt ";
pub const DATA_TAG: &[u8; 4] = b"data";

/// Generate a 44-byte WAV header with both size fields set to 0.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (placeholder 0, patched on finalize)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16
/// [20-21]  format tag (1 = PCM, 3 = IEEE float)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * bits_per_sample / 8 * channels
/// [32-33]  block_align = bits_per_sample / 8 * channels
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data size (placeholder 0, patched on finalize)
/// ```
pub fn generate_wav_header(config: &WriterConfig, order: ByteOrder) -> [u8; WAV_HEADER_SIZE] {
    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(RIFF_TAG);
    header[4..8].copy_from_slice(&encode32(0, order));
    header[8..12].copy_from_slice(WAVE_TAG);

    // fmt sub-chunk
    header[12..16].copy_from_slice(FMT_TAG);
    header[16..20].copy_from_slice(&encode32(FMT_CORE_SIZE, order));
    header[20..22].copy_from_slice(&encode16(config.sample_format().format_tag(), order));
    header[22..24].copy_from_slice(&encode16(config.channels, order));
    header[24..28].copy_from_slice(&encode32(config.sample_rate, order));
    header[28..32].copy_from_slice(&encode32(config.byte_rate(), order));
    header[32..34].copy_from_slice(&encode16(config.block_align(), order));
    header[34..36].copy_from_slice(&encode16(config.bits_per_sample, order));

    // data sub-chunk
    header[36..40].copy_from_slice(DATA_TAG);
    header[40..44].copy_from_slice(&encode32(0, order));

    header
}

/// RIFF chunk size for a finished file of `file_size` bytes.
///
/// `None` when the file is shorter than the header or too large for a 32-bit field.
pub fn riff_chunk_size(file_size: u64) -> Option<u32> {
    if file_size < WAV_HEADER_SIZE as u64 {
        return None;
    }
    u32::try_from(file_size - RIFF_PREAMBLE_SIZE).ok()
}

/// `data` chunk size for a finished file: everything after the header.
pub fn data_chunk_size(file_size: u64) -> Option<u32> {
    let data = file_size.checked_sub(WAV_HEADER_SIZE as u64)?;
    u32::try_from(data).ok()
}
