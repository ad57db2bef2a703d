use serde::{Deserialize, Serialize};

use super::error::WavError;
use super::format::{FormatDescriptor, SampleFormat};

/// Output format for a [`RiffWavWriter`](crate::storage::wav_writer::RiffWavWriter).
///
/// Fixed for the lifetime of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Bits per sample (default: 16). Must be a whole number of bytes.
    pub bits_per_sample: u16,

    /// Number of interleaved channels (default: 2).
    pub channels: u16,

    /// Sample rate in Hz (default: 48000).
    pub sample_rate: u32,

    /// `true` writes integer PCM (tag 1), `false` writes IEEE float (tag 3).
    pub is_integer: bool,
}

impl WriterConfig {
    pub fn validate(&self) -> Result<(), WavError> {
        if self.sample_rate == 0 {
            return Err(WavError::ConfigurationFailed("sample rate must be positive".into()));
        }
        if self.channels == 0 {
            return Err(WavError::ConfigurationFailed("channel count must be at least 1".into()));
        }
        if self.bits_per_sample == 0 || self.bits_per_sample % 8 != 0 {
            return Err(WavError::ConfigurationFailed(format!(
                "unsupported bit depth: {}",
                self.bits_per_sample
            )));
        }
        if !self.is_integer && self.bits_per_sample != 32 {
            return Err(WavError::ConfigurationFailed(format!(
                "IEEE float output requires 32 bits, got {}",
                self.bits_per_sample
            )));
        }
        let block_align = self.bits_per_sample as u32 / 8 * self.channels as u32;
        if block_align > u16::MAX as u32 || block_align as u64 * self.sample_rate as u64 > u32::MAX as u64 {
            return Err(WavError::ConfigurationFailed("frame size or byte rate overflows the fmt chunk".into()));
        }
        Ok(())
    }

    /// Same layout as an existing file, e.g. to re-encode what a reader produced.
    pub fn from_format(format: &FormatDescriptor) -> Self {
        Self {
            bits_per_sample: format.bits_per_sample(),
            channels: format.channels(),
            sample_rate: format.sample_rate(),
            is_integer: format.sample_format() == SampleFormat::Pcm,
        }
    }

    pub fn sample_format(&self) -> SampleFormat {
        if self.is_integer {
            SampleFormat::Pcm
        } else {
            SampleFormat::IeeeFloat
        }
    }

    /// Bytes per multi-channel frame.
    pub fn block_align(&self) -> u16 {
        self.bits_per_sample / 8 * self.channels
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            bits_per_sample: 16,
            channels: 2,
            sample_rate: 48000,
            is_integer: true,
        }
    }
}
