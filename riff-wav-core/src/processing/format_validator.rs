//! Consistency checks for a decoded `fmt ` chunk.
//!
//! Two shapes are accepted: integer PCM (tag 1, any whole-byte depth) and
//! 32-bit IEEE float (tag 3). Both must satisfy
//! `block_align == bits_per_sample / 8 * channels` and
//! `byte_rate == sample_rate * block_align`.

use crate::models::format::{FmtFields, FORMAT_TAG_IEEE_FLOAT, FORMAT_TAG_PCM};

pub fn validate(fields: &FmtFields) -> Result<(), String> {
    match fields.format_tag {
        FORMAT_TAG_PCM => {}
        FORMAT_TAG_IEEE_FLOAT => {
            if fields.bits_per_sample / 8 != 4 {
                return Err(format!(
                    "IEEE float requires 32-bit samples, got {} bits",
                    fields.bits_per_sample
                ));
            }
        }
        other => return Err(format!("unsupported format tag: {}", other)),
    }

    if fields.channels == 0 {
        return Err("channel count must be at least 1".into());
    }
    if fields.sample_rate == 0 {
        return Err("sample rate must be positive".into());
    }
    if fields.block_align == 0 {
        return Err("block align must be positive".into());
    }

    let expected_block_align = (fields.bits_per_sample / 8) as u32 * fields.channels as u32;
    if fields.block_align as u32 != expected_block_align {
        return Err(format!(
            "block align {} does not match {} bits x {} channels",
            fields.block_align, fields.bits_per_sample, fields.channels
        ));
    }

    let expected_byte_rate = fields.sample_rate as u64 * fields.block_align as u64;
    if fields.byte_rate as u64 != expected_byte_rate {
        return Err(format!(
            "byte rate {} does not match {} Hz x {} bytes per frame",
            fields.byte_rate, fields.sample_rate, fields.block_align
        ));
    }

    Ok(())
}
