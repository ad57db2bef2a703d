use serde::{Deserialize, Serialize};

use super::error::WavError;
use crate::processing::format_validator;

/// `wFormatTag` for integer PCM.
pub const FORMAT_TAG_PCM: u16 = 1;

/// `wFormatTag` for IEEE float.
pub const FORMAT_TAG_IEEE_FLOAT: u16 = 3;

/// Sample encoding accepted by the reader and emitted by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleFormat {
    Pcm,
    IeeeFloat,
}

impl SampleFormat {
    pub fn format_tag(self) -> u16 {
        match self {
            Self::Pcm => FORMAT_TAG_PCM,
            Self::IeeeFloat => FORMAT_TAG_IEEE_FLOAT,
        }
    }
}

/// The six fields of a `fmt ` chunk exactly as they were decoded, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtFields {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// A validated `fmt ` chunk.
///
/// Only obtainable through [`FormatDescriptor::try_from`], so every instance
/// satisfies `block_align == bits_per_sample / 8 * channels` and
/// `byte_rate == sample_rate * block_align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

impl FormatDescriptor {
    pub fn format_tag(&self) -> u16 {
        self.format_tag
    }

    pub fn sample_format(&self) -> SampleFormat {
        if self.format_tag == FORMAT_TAG_IEEE_FLOAT {
            SampleFormat::IeeeFloat
        } else {
            SampleFormat::Pcm
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    /// Bytes per multi-channel frame.
    pub fn block_align(&self) -> u16 {
        self.block_align
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Number of whole frames contained in `bytes` of sample data.
    pub fn frames_in(&self, bytes: u64) -> u64 {
        bytes / self.block_align as u64
    }

    /// Playback duration of `bytes` of sample data, in seconds.
    pub fn duration_secs(&self, bytes: u64) -> f64 {
        bytes as f64 / self.byte_rate as f64
    }
}

impl TryFrom<FmtFields> for FormatDescriptor {
    type Error = WavError;

    fn try_from(fields: FmtFields) -> Result<Self, Self::Error> {
        format_validator::validate(&fields).map_err(|reason| {
            log::debug!("rejected fmt chunk {:?}: {}", fields, reason);
            WavError::NotRiffWav
        })?;
        Ok(Self {
            format_tag: fields.format_tag,
            channels: fields.channels,
            sample_rate: fields.sample_rate,
            byte_rate: fields.byte_rate,
            block_align: fields.block_align,
            bits_per_sample: fields.bits_per_sample,
        })
    }
}

/// Absolute byte range of the `data` chunk payload.
///
/// The current read position lives in the underlying stream, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamWindow {
    pub data_offset: u64,
    pub data_length: u64,
}

impl StreamWindow {
    pub fn end(&self) -> u64 {
        self.data_offset + self.data_length
    }

    pub fn contains(&self, position: u64) -> bool {
        position >= self.data_offset && position < self.end()
    }
}
