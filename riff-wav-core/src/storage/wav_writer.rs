use std::path::Path;

use crate::models::config::WriterConfig;
use crate::models::error::WavError;
use crate::models::state::WriterState;
use crate::processing::wav_format::{self, DATA_SIZE_OFFSET, RIFF_SIZE_OFFSET};
use crate::storage::file_stream::FileStream;
use crate::traits::byte_stream::{ByteStream, SeekOrigin};

/// Two-phase RIFF-WAV writer: header first, sizes patched last.
///
/// ## File Format
///
/// ```text
/// [44-byte header, RIFF and data sizes = 0]   ← prepare()
/// [raw sample bytes...]                       ← write_samples() / stream_mut()
/// [sizes at offsets 4 and 40 patched]         ← finalize()
/// ```
///
/// Skipping [`RiffWavWriter::finalize`] leaves a well-formed file whose
/// `data` chunk reports zero bytes.
pub struct RiffWavWriter<S: ByteStream> {
    stream: S,
    config: WriterConfig,
    state: WriterState,
    sample_bytes_written: u64,
}

impl RiffWavWriter<FileStream> {
    /// Create (or truncate) `path` and write the header.
    pub fn create(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self, WavError> {
        let mut writer = Self::new(FileStream::create_write(path)?, config)?;
        writer.prepare()?;
        Ok(writer)
    }
}

impl<S: ByteStream> RiffWavWriter<S> {
    pub fn new(stream: S, config: WriterConfig) -> Result<Self, WavError> {
        config.validate()?;
        Ok(Self {
            stream,
            config,
            state: WriterState::HeaderPending,
            sample_bytes_written: 0,
        })
    }

    /// Write the 44-byte header at the start of the stream.
    ///
    /// Fails with [`WavError::NotRiffWav`] if the header was already written
    /// or any part of it could not be written.
    pub fn prepare(&mut self) -> Result<(), WavError> {
        if !self.state.is_header_pending() {
            log::debug!("header already written (state {:?})", self.state);
            return Err(WavError::NotRiffWav);
        }

        let header = wav_format::generate_wav_header(&self.config, self.stream.byte_order());
        let written = self
            .stream
            .seek(0, SeekOrigin::Start)
            .and_then(|_| self.stream.write_exact(&header));
        if let Err(e) = written {
            log::debug!("failed to write WAV header: {}", e);
            return Err(WavError::NotRiffWav);
        }

        self.state = WriterState::Streaming;
        Ok(())
    }

    /// Append raw, already-encoded sample bytes.
    pub fn write_samples(&mut self, data: &[u8]) -> Result<(), WavError> {
        if !self.state.is_streaming() {
            return Err(WavError::StorageError(format!(
                "writer is not accepting samples (state {:?})",
                self.state
            )));
        }
        if data.is_empty() {
            return Ok(());
        }

        self.stream.write_exact(data)?;
        self.sample_bytes_written += data.len() as u64;
        Ok(())
    }

    /// Patch the RIFF size (offset 4) and `data` size (offset 40) from the
    /// current stream length.
    ///
    /// Repeating the call without further writes rewrites identical bytes.
    pub fn finalize(&mut self) -> Result<(), WavError> {
        if !self.state.can_finalize() {
            log::debug!("finalize called before the header was written");
            return Err(WavError::NotRiffWav);
        }

        match self.patch_sizes() {
            Ok(file_size) => {
                log::debug!("finalized WAV: {} bytes total", file_size);
                self.state = WriterState::Finalized;
                Ok(())
            }
            Err(e) => {
                log::debug!("failed to finalize WAV: {}", e);
                Err(WavError::NotRiffWav)
            }
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Sample bytes accepted through [`RiffWavWriter::write_samples`].
    pub fn sample_bytes_written(&self) -> u64 {
        self.sample_bytes_written
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Direct access to the sink, for callers that write samples themselves.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn patch_sizes(&mut self) -> Result<u64, WavError> {
        let file_size = self.stream.seek(0, SeekOrigin::End)?;
        let riff_size = wav_format::riff_chunk_size(file_size).ok_or_else(|| {
            WavError::StorageError(format!("file size {} does not fit a RIFF header", file_size))
        })?;
        let data_size = wav_format::data_chunk_size(file_size).ok_or_else(|| {
            WavError::StorageError(format!("file size {} does not fit a data chunk", file_size))
        })?;

        self.stream.seek(RIFF_SIZE_OFFSET as i64, SeekOrigin::Start)?;
        self.stream.write_u32(riff_size)?;

        self.stream.seek(DATA_SIZE_OFFSET as i64, SeekOrigin::Start)?;
        self.stream.write_u32(data_size)?;

        self.stream.seek(0, SeekOrigin::End)?;
        self.stream.flush()?;
        Ok(file_size)
    }
}
