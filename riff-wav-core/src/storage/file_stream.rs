use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::error::WavError;
use crate::processing::byte_codec::ByteOrder;
use crate::traits::byte_stream::{ByteStream, SeekOrigin};

/// [`ByteStream`] over a file on disk.
///
/// The handle is released by [`FileStream::close`] or when the stream is
/// dropped, whichever comes first.
#[derive(Debug, Default)]
pub struct FileStream {
    file_path: Option<PathBuf>,
    file: Option<File>,
    byte_order: ByteOrder,
}

impl FileStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an existing file read-only.
    pub fn open_read(path: impl AsRef<Path>) -> Result<Self, WavError> {
        let mut stream = Self::new();
        stream.open(path)?;
        Ok(stream)
    }

    /// Create (or truncate) a file for writing.
    pub fn create_write(path: impl AsRef<Path>) -> Result<Self, WavError> {
        let mut stream = Self::new();
        stream.create(path)?;
        Ok(stream)
    }

    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), WavError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| WavError::StorageError(format!("failed to open {}: {}", path.display(), e)))?;
        self.attach(path, file);
        Ok(())
    }

    pub fn create(&mut self, path: impl AsRef<Path>) -> Result<(), WavError> {
        let path = path.as_ref();

        // Ensure output directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| WavError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| WavError::StorageError(format!("failed to create {}: {}", path.display(), e)))?;
        self.attach(path, file);
        Ok(())
    }

    pub fn close(&mut self) {
        self.file = None;
    }

    /// Path of the most recently opened file.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn attach(&mut self, path: &Path, file: File) {
        self.file_path = Some(path.to_path_buf());
        self.file = Some(file);
    }

    fn file_mut(&mut self) -> Result<&mut File, WavError> {
        self.file.as_mut().ok_or(WavError::IoUnavailable)
    }
}

impl ByteStream for FileStream {
    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, WavError> {
        let target = match origin {
            SeekOrigin::Start => {
                let start = u64::try_from(offset)
                    .map_err(|_| WavError::InvalidArgument(format!("negative absolute offset {}", offset)))?;
                SeekFrom::Start(start)
            }
            SeekOrigin::Current => SeekFrom::Current(offset),
            SeekOrigin::End => SeekFrom::End(offset),
        };
        Ok(self.file_mut()?.seek(target)?)
    }

    fn tell(&mut self) -> Result<u64, WavError> {
        Ok(self.file_mut()?.stream_position()?)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, WavError> {
        let file = self.file_mut()?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(WavError::StorageError(format!("read failed: {}", e))),
            }
        }
        Ok(filled)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, WavError> {
        let file = self.file_mut()?;
        let mut written = 0;
        while written < buf.len() {
            match file.write(&buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(WavError::StorageError(format!("write failed: {}", e))),
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> Result<(), WavError> {
        Ok(self.file_mut()?.flush()?)
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }
}
