use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use crate::models::error::WavError;
use crate::processing::byte_codec::ByteOrder;
use crate::traits::byte_stream::{ByteStream, SeekOrigin};

/// [`ByteStream`] over an in-memory buffer.
///
/// Writes past the end grow the buffer; seeking past the end is allowed
/// and reads there return zero bytes, matching file semantics.
#[derive(Debug, Default)]
pub struct MemoryStream {
    cursor: Option<Cursor<Vec<u8>>>,
    byte_order: ByteOrder,
}

impl MemoryStream {
    /// Open, empty buffer.
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Open stream positioned at the start of `bytes`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            cursor: Some(Cursor::new(bytes)),
            byte_order: ByteOrder::default(),
        }
    }

    /// Drop the buffer. Subsequent operations fail with `IoUnavailable`.
    pub fn close(&mut self) {
        self.cursor = None;
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.cursor.as_ref().map(|c| c.get_ref().as_slice())
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.cursor.map(Cursor::into_inner)
    }

    fn cursor_mut(&mut self) -> Result<&mut Cursor<Vec<u8>>, WavError> {
        self.cursor.as_mut().ok_or(WavError::IoUnavailable)
    }
}

impl ByteStream for MemoryStream {
    fn is_open(&self) -> bool {
        self.cursor.is_some()
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
        Ok(self.cursor_mut()?.seek(target)?)
    }

    fn tell(&mut self) -> Result<u64, WavError> {
        Ok(self.cursor_mut()?.position())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, WavError> {
        Ok(self.cursor_mut()?.read(buf)?)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, WavError> {
        Ok(self.cursor_mut()?.write(buf)?)
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }
}
