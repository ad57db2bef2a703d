//! # riff-wav-core
//!
//! Reader and writer for the RIFF-WAV container.
//!
//! The reader walks the chunk list, validates the `fmt ` chunk and serves
//! frame-aligned reads bounded to the `data` payload. The writer emits a
//! fixed 44-byte header, accepts raw sample bytes and patches both size
//! fields once the final length is known. Both are generic over the
//! `ByteStream` trait, so files and in-memory buffers work the same way.
//!
//! ## Architecture
//!
//! ```text
//! riff-wav-core (this crate)
//! ├── traits/       ← ByteStream, SeekOrigin
//! ├── models/       ← WavError, FormatDescriptor, StreamWindow, WriterConfig, WriterState, StreamRead
//! ├── processing/   ← byte codec, fmt validation, 44-byte header layout
//! └── storage/      ← RiffWavReader, RiffWavWriter, FileStream, MemoryStream, metadata sidecar
//! ```
//!
//! ## Usage
//! ```no_run
//! use riff_wav_core::{RiffWavReader, RiffWavWriter, WriterConfig};
//!
//! let config = WriterConfig { channels: 1, sample_rate: 44100, ..Default::default() };
//! let mut writer = RiffWavWriter::create("tone.wav", config)?;
//! writer.write_samples(&[0u8; 88200])?;
//! writer.finalize()?;
//!
//! let mut reader = RiffWavReader::open("tone.wav")?;
//! let mut frames = vec![0u8; 1024 * 2];
//! while !reader.read_frames(&mut frames, 1024)?.is_end() {}
//! # Ok::<(), riff_wav_core::WavError>(())
//! ```

pub mod models;
pub mod processing;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::WriterConfig;
pub use models::error::WavError;
pub use models::format::{FmtFields, FormatDescriptor, SampleFormat, StreamWindow};
pub use models::state::{ReadStatus, StreamRead, WriterState};
pub use processing::byte_codec::ByteOrder;
pub use storage::file_stream::FileStream;
pub use storage::memory_stream::MemoryStream;
pub use storage::metadata::WavFileMetadata;
pub use storage::wav_reader::RiffWavReader;
pub use storage::wav_writer::RiffWavWriter;
pub use traits::byte_stream::{ByteStream, SeekOrigin};
