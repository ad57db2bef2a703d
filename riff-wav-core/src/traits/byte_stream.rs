use crate::models::error::WavError;
use crate::processing::byte_codec::{self, ByteOrder};

/// Reference point for [`ByteStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    Start,
    Current,
    End,
}

/// Seekable binary stream consumed by the RIFF-WAV reader and writer.
///
/// Implementations carry no WAV knowledge. Every method fails with
/// [`WavError::IoUnavailable`] while the stream is not open. Multi-byte
/// fields are encoded in [`ByteStream::byte_order`] (little-endian unless
/// overridden).
///
/// Implemented by:
/// - `FileStream` (files on disk)
/// - `MemoryStream` (in-memory buffers)
pub trait ByteStream {
    fn is_open(&self) -> bool;

    /// Move the cursor; returns the new absolute position.
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, WavError>;

    /// Current absolute position.
    fn tell(&mut self) -> Result<u64, WavError>;

    /// Read up to `buf.len()` bytes; returns the count actually read (0 at end of stream).
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, WavError>;

    /// Write up to `buf.len()` bytes; returns the count actually written.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, WavError>;

    /// Push buffered writes to the backing store.
    fn flush(&mut self) -> Result<(), WavError> {
        Ok(())
    }

    fn byte_order(&self) -> ByteOrder;

    fn set_byte_order(&mut self, order: ByteOrder);

    /// Fill `buf` completely or fail with [`WavError::ShortTransfer`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WavError> {
        let actual = self.read_bytes(buf)?;
        if actual != buf.len() {
            return Err(WavError::ShortTransfer { expected: buf.len(), actual });
        }
        Ok(())
    }

    /// Write all of `buf` or fail with [`WavError::ShortTransfer`].
    fn write_exact(&mut self, buf: &[u8]) -> Result<(), WavError> {
        let actual = self.write_bytes(buf)?;
        if actual != buf.len() {
            return Err(WavError::ShortTransfer { expected: buf.len(), actual });
        }
        Ok(())
    }

    fn read_u16(&mut self) -> Result<u16, WavError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(byte_codec::decode16(buf, self.byte_order()))
    }

    fn read_u32(&mut self) -> Result<u32, WavError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(byte_codec::decode32(buf, self.byte_order()))
    }

    fn write_u16(&mut self, value: u16) -> Result<(), WavError> {
        let bytes = byte_codec::encode16(value, self.byte_order());
        self.write_exact(&bytes)
    }

    fn write_u32(&mut self, value: u32) -> Result<(), WavError> {
        let bytes = byte_codec::encode32(value, self.byte_order());
        self.write_exact(&bytes)
    }
}
