use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::error::WavError;
use crate::models::format::SampleFormat;
use crate::storage::wav_reader::RiffWavReader;

/// Description of a finished WAV file, stored as a JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavFileMetadata {
    pub id: String,
    pub file_path: String,
    pub checksum: String,
    pub created_at: String,
    pub sample_format: SampleFormat,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_length: u64,
    pub duration_secs: f64,
}

/// Prepare a reader over `path` and describe what it found.
///
/// Fails with [`WavError::NotRiffWav`] if the file is not a valid RIFF-WAV.
pub fn describe_file(path: &Path) -> Result<WavFileMetadata, WavError> {
    let reader = RiffWavReader::open(path)?;
    let format = *reader.format().ok_or(WavError::NotRiffWav)?;
    let data_length = reader.data_length().ok_or(WavError::NotRiffWav)?;
    drop(reader);

    Ok(WavFileMetadata {
        id: uuid::Uuid::new_v4().to_string(),
        file_path: path.display().to_string(),
        checksum: sha256_file(path)?,
        created_at: chrono::Utc::now().to_rfc3339(),
        sample_format: format.sample_format(),
        channels: format.channels(),
        sample_rate: format.sample_rate(),
        bits_per_sample: format.bits_per_sample(),
        data_length,
        duration_secs: format.duration_secs(data_length),
    })
}

/// Write metadata as a JSON sidecar file.
///
/// Creates `{wav_path}.metadata.json` alongside the recording.
pub fn write_metadata(metadata: &WavFileMetadata, wav_path: &Path) -> Result<(), WavError> {
    let metadata_path = wav_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| WavError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| WavError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read metadata from a JSON sidecar file.
pub fn read_metadata(wav_path: &Path) -> Result<WavFileMetadata, WavError> {
    let metadata_path = wav_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| WavError::StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: WavFileMetadata = serde_json::from_str(&json)
        .map_err(|e| WavError::StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

/// Compute SHA-256 hex digest of a file.
pub fn sha256_file(path: &Path) -> Result<String, WavError> {
    let data =
        fs::read(path).map_err(|e| WavError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    let digest = Sha256::digest(&data);
    Ok(hex_encode(&digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
