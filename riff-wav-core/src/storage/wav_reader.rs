use std::path::Path;

use crate::models::error::WavError;
use crate::models::format::{FmtFields, FormatDescriptor, StreamWindow};
use crate::models::state::{ReadStatus, StreamRead};
use crate::processing::wav_format::{DATA_TAG, FMT_CORE_SIZE, FMT_TAG, RIFF_TAG, WAVE_TAG};
use crate::storage::file_stream::FileStream;
use crate::traits::byte_stream::{ByteStream, SeekOrigin};

/// Frame-aligned reader for RIFF-WAV sample data.
///
/// A reader starts unprepared. [`RiffWavReader::prepare`] walks the chunk
/// list once, validates the `fmt ` chunk and records the byte window of the
/// `data` payload; every later read is bounded to that window.
///
/// ```text
/// "RIFF" size "WAVE" [other chunks...] "fmt " cksize <16 bytes> [ext] "data" size <samples>
///                                                                           └── window ──┘
/// ```
pub struct RiffWavReader<S: ByteStream> {
    stream: S,
    prepared: Option<Prepared>,
}

#[derive(Debug, Clone, Copy)]
struct Prepared {
    format: FormatDescriptor,
    window: StreamWindow,
}

impl RiffWavReader<FileStream> {
    /// Open `path` and prepare it. The file handle is released if preparation fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WavError> {
        let mut reader = Self::new(FileStream::open_read(path)?);
        reader.prepare()?;
        Ok(reader)
    }
}

impl<S: ByteStream> RiffWavReader<S> {
    pub fn new(stream: S) -> Self {
        Self { stream, prepared: None }
    }

    /// Locate and validate the `fmt ` and `data` chunks.
    ///
    /// Any failure, structural or I/O, is reported as [`WavError::NotRiffWav`]
    /// and leaves the reader unprepared.
    pub fn prepare(&mut self) -> Result<(), WavError> {
        self.prepared = None;
        match scan_chunks(&mut self.stream) {
            Ok((format, window)) => {
                log::debug!(
                    "prepared RIFF-WAV: {} Hz, {} ch, {} bit, {} data bytes at offset {}",
                    format.sample_rate(),
                    format.channels(),
                    format.bits_per_sample(),
                    window.data_length,
                    window.data_offset
                );
                self.prepared = Some(Prepared { format, window });
                Ok(())
            }
            Err(e) => {
                log::debug!("RIFF-WAV preparation failed: {}", e);
                Err(WavError::NotRiffWav)
            }
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    pub fn format(&self) -> Option<&FormatDescriptor> {
        self.prepared.as_ref().map(|p| &p.format)
    }

    pub fn window(&self) -> Option<StreamWindow> {
        self.prepared.map(|p| p.window)
    }

    /// Readable sample bytes, clamped to the physical file length.
    pub fn data_length(&self) -> Option<u64> {
        self.prepared.map(|p| p.window.data_length)
    }

    pub fn frame_count(&self) -> Option<u64> {
        self.prepared.map(|p| p.format.frames_in(p.window.data_length))
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.prepared.map(|p| p.format.duration_secs(p.window.data_length))
    }

    /// Read `frames` whole frames (`frames * block_align` bytes) into `buf`.
    pub fn read_frames(&mut self, buf: &mut [u8], frames: usize) -> Result<StreamRead, WavError> {
        let prepared = self.prepared.ok_or(WavError::NotRiffWav)?;
        let count = frames
            .checked_mul(prepared.format.block_align() as usize)
            .ok_or_else(|| WavError::InvalidArgument(format!("{} frames overflow the byte count", frames)))?;
        self.read_stream(buf, count)
    }

    /// Read up to `count` bytes of sample data into `buf`.
    ///
    /// Outcomes, in precedence order:
    /// - not prepared: `Err(NotRiffWav)`
    /// - `count == 0`: `Ok` with zero bytes, the stream is not touched
    /// - `buf` shorter than `count`: `Err(InvalidArgument)`
    /// - already at or past the window end: `Err(ReadError)`
    /// - otherwise `EndReached` if this call reached the window end, else `Ok`
    pub fn read_stream(&mut self, buf: &mut [u8], count: usize) -> Result<StreamRead, WavError> {
        let window = self.prepared.ok_or(WavError::NotRiffWav)?.window;
        if count == 0 {
            return Ok(StreamRead::empty());
        }
        if buf.len() < count {
            return Err(WavError::InvalidArgument(format!(
                "buffer holds {} bytes, {} requested",
                buf.len(),
                count
            )));
        }

        let position = self.stream.tell().map_err(|e| WavError::ReadError(e.to_string()))?;
        if position >= window.end() {
            return Err(WavError::ReadError("end of data window reached".into()));
        }

        let remaining = window.end() - position;
        let to_read = (count as u64).min(remaining) as usize;
        let bytes_read = self
            .stream
            .read_bytes(&mut buf[..to_read])
            .map_err(|e| WavError::ReadError(e.to_string()))?;

        // A short read means the physical end arrived early; nothing more will follow.
        let status = if bytes_read < to_read || position + bytes_read as u64 >= window.end() {
            ReadStatus::EndReached
        } else {
            ReadStatus::Ok
        };
        Ok(StreamRead { status, bytes_read })
    }

    /// Position the stream at frame `frame` of the data window.
    ///
    /// Seeking to `frame_count()` is allowed and leaves the reader at the end.
    pub fn seek_frame(&mut self, frame: u64) -> Result<(), WavError> {
        let prepared = self.prepared.ok_or(WavError::NotRiffWav)?;
        let frames = prepared.format.frames_in(prepared.window.data_length);
        if frame > frames {
            return Err(WavError::InvalidArgument(format!(
                "frame {} out of range (0-{})",
                frame, frames
            )));
        }
        let offset = prepared.window.data_offset + frame * prepared.format.block_align() as u64;
        let offset = i64::try_from(offset)
            .map_err(|_| WavError::InvalidArgument(format!("offset {} out of range", offset)))?;
        self.stream.seek(offset, SeekOrigin::Start)?;
        Ok(())
    }

    /// Bytes already consumed from the data window.
    pub fn position_in_window(&mut self) -> Result<u64, WavError> {
        let window = self.prepared.ok_or(WavError::NotRiffWav)?.window;
        let position = self.stream.tell()?;
        Ok(position.saturating_sub(window.data_offset).min(window.data_length))
    }

    /// Bytes left before the window end.
    pub fn remaining_bytes(&mut self) -> Result<u64, WavError> {
        let window = self.prepared.ok_or(WavError::NotRiffWav)?.window;
        let consumed = self.position_in_window()?;
        Ok(window.data_length - consumed)
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

/// Walk the chunk list from offset 0 and return the validated format and data window.
fn scan_chunks<S: ByteStream>(stream: &mut S) -> Result<(FormatDescriptor, StreamWindow), WavError> {
    let file_end = stream.seek(0, SeekOrigin::End)?;
    stream.seek(0, SeekOrigin::Start)?;

    expect_tag(stream, RIFF_TAG)?;
    // Declared RIFF size is untrusted; the window is bounded by `file_end` instead.
    stream.seek(4, SeekOrigin::Current)?;
    expect_tag(stream, WAVE_TAG)?;

    loop {
        let tag = read_tag(stream)?;
        if &tag == FMT_TAG {
            break;
        }
        let skip = stream.read_u32()?;
        log::debug!("skipping {:?} chunk of {} bytes", String::from_utf8_lossy(&tag), skip);
        stream.seek(skip as i64, SeekOrigin::Current)?;
    }

    let cksize = stream.read_u32()?;
    if cksize < FMT_CORE_SIZE {
        log::debug!("fmt chunk declares {} bytes, need {}", cksize, FMT_CORE_SIZE);
        return Err(WavError::NotRiffWav);
    }
    let fields = FmtFields {
        format_tag: stream.read_u16()?,
        channels: stream.read_u16()?,
        sample_rate: stream.read_u32()?,
        byte_rate: stream.read_u32()?,
        block_align: stream.read_u16()?,
        bits_per_sample: stream.read_u16()?,
    };
    let format = FormatDescriptor::try_from(fields)?;

    if cksize > FMT_CORE_SIZE {
        stream.seek((cksize - FMT_CORE_SIZE) as i64, SeekOrigin::Current)?;
    }

    expect_tag(stream, DATA_TAG)?;
    let declared = stream.read_u32()? as u64;
    let data_offset = stream.tell()?;
    let available = file_end.saturating_sub(data_offset);
    if declared > available {
        log::warn!(
            "data chunk declares {} bytes but only {} remain; clamping",
            declared,
            available
        );
    }

    Ok((
        format,
        StreamWindow {
            data_offset,
            data_length: declared.min(available),
        },
    ))
}

fn read_tag<S: ByteStream>(stream: &mut S) -> Result<[u8; 4], WavError> {
    let mut tag = [0u8; 4];
    stream.read_exact(&mut tag)?;
    Ok(tag)
}

fn expect_tag<S: ByteStream>(stream: &mut S, expected: &[u8; 4]) -> Result<(), WavError> {
    let tag = read_tag(stream)?;
    if &tag != expected {
        log::debug!(
            "expected {:?} tag, found {:?}",
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(&tag)
        );
        return Err(WavError::NotRiffWav);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::byte_codec::ByteOrder;
    use crate::storage::memory_stream::MemoryStream;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Minimal WAV image: `pre` chunks, a `fmt ` chunk, then `data`.
    struct Fixture {
        pre: Vec<u8>,
        fmt: FmtFields,
        fmt_ext: Vec<u8>,
        declared_data: Option<u32>,
        data: Vec<u8>,
        post: Vec<u8>,
    }

    impl Fixture {
        /// 16-bit stereo 44.1 kHz PCM with `frames` frames of ascending bytes.
        fn pcm_stereo(frames: usize) -> Self {
            Self {
                pre: Vec::new(),
                fmt: FmtFields {
                    format_tag: 1,
                    channels: 2,
                    sample_rate: 44100,
                    byte_rate: 176_400,
                    block_align: 4,
                    bits_per_sample: 16,
                },
                fmt_ext: Vec::new(),
                declared_data: None,
                data: (0..frames * 4).map(|i| i as u8).collect(),
                post: Vec::new(),
            }
        }

        fn build(&self) -> Vec<u8> {
            let mut out = Vec::new();
            out.extend_from_slice(b"RIFF");
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(b"WAVE");
            out.extend_from_slice(&self.pre);
            out.extend_from_slice(b"fmt ");
            out.extend_from_slice(&(16 + self.fmt_ext.len() as u32).to_le_bytes());
            out.extend_from_slice(&self.fmt.format_tag.to_le_bytes());
            out.extend_from_slice(&self.fmt.channels.to_le_bytes());
            out.extend_from_slice(&self.fmt.sample_rate.to_le_bytes());
            out.extend_from_slice(&self.fmt.byte_rate.to_le_bytes());
            out.extend_from_slice(&self.fmt.block_align.to_le_bytes());
            out.extend_from_slice(&self.fmt.bits_per_sample.to_le_bytes());
            out.extend_from_slice(&self.fmt_ext);
            out.extend_from_slice(b"data");
            let declared = self.declared_data.unwrap_or(self.data.len() as u32);
            out.extend_from_slice(&declared.to_le_bytes());
            out.extend_from_slice(&self.data);
            out.extend_from_slice(&self.post);
            out
        }

        fn reader(&self) -> RiffWavReader<MemoryStream> {
            RiffWavReader::new(MemoryStream::from_bytes(self.build()))
        }
    }

    fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = tag.to_vec();
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// Delegates to a `MemoryStream` and counts every call.
    struct CountingStream {
        inner: MemoryStream,
        calls: Rc<Cell<usize>>,
    }

    impl CountingStream {
        fn bump(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl ByteStream for CountingStream {
        fn is_open(&self) -> bool {
            self.inner.is_open()
        }
        fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, WavError> {
            self.bump();
            self.inner.seek(offset, origin)
        }
        fn tell(&mut self) -> Result<u64, WavError> {
            self.bump();
            self.inner.tell()
        }
        fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, WavError> {
            self.bump();
            self.inner.read_bytes(buf)
        }
        fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, WavError> {
            self.bump();
            self.inner.write_bytes(buf)
        }
        fn byte_order(&self) -> ByteOrder {
            self.inner.byte_order()
        }
        fn set_byte_order(&mut self, order: ByteOrder) {
            self.inner.set_byte_order(order);
        }
    }

    #[test]
    fn prepares_minimal_pcm() {
        let mut reader = Fixture::pcm_stereo(4).reader();
        assert!(!reader.is_prepared());
        reader.prepare().unwrap();

        let format = reader.format().unwrap();
        assert_eq!(format.format_tag(), 1);
        assert_eq!(format.channels(), 2);
        assert_eq!(format.sample_rate(), 44100);
        assert_eq!(format.block_align(), 4);
        assert_eq!(format.bits_per_sample(), 16);
        assert_eq!(reader.window(), Some(StreamWindow { data_offset: 44, data_length: 16 }));
        assert_eq!(reader.frame_count(), Some(4));
    }

    #[test]
    fn skips_foreign_chunks_before_fmt() {
        let mut fixture = Fixture::pcm_stereo(2);
        fixture.pre = [chunk(b"LIST", b"INFOabcd"), chunk(b"fact", &[0; 4])].concat();
        let mut reader = fixture.reader();
        reader.prepare().unwrap();
        assert_eq!(reader.window(), Some(StreamWindow { data_offset: 44 + 16 + 12, data_length: 8 }));
    }

    #[test]
    fn skips_extended_fmt_bytes() {
        let mut fixture = Fixture::pcm_stereo(2);
        fixture.fmt_ext = vec![0, 0];
        let mut reader = fixture.reader();
        reader.prepare().unwrap();
        assert_eq!(reader.window().unwrap().data_offset, 46);
    }

    #[test]
    fn rejects_missing_riff_signature() {
        let mut bytes = Fixture::pcm_stereo(1).build();
        bytes[0..4].copy_from_slice(b"RIFX");
        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(bytes));
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
        assert!(reader.format().is_none());
        assert!(reader.window().is_none());
    }

    #[test]
    fn rejects_missing_wave_signature() {
        let mut bytes = Fixture::pcm_stereo(1).build();
        bytes[8..12].copy_from_slice(b"AVI ");
        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(bytes));
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
        assert!(reader.format().is_none());
    }

    #[test]
    fn rejects_stream_without_fmt() {
        let mut bytes = b"RIFF\0\0\0\0WAVE".to_vec();
        bytes.extend(chunk(b"LIST", b"xxxx"));
        bytes.extend(chunk(b"data", &[0; 8]));
        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(bytes));
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
        assert!(reader.format().is_none());
    }

    #[test]
    fn rejects_stream_without_data() {
        let bytes = Fixture::pcm_stereo(0).build();
        let truncated = bytes[..36].to_vec();
        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(truncated));
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
        assert!(reader.format().is_none());
    }

    #[test]
    fn rejects_chunk_between_fmt_and_data() {
        let mut bytes = Fixture::pcm_stereo(0).build();
        bytes[36..40].copy_from_slice(b"LIST");
        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(bytes));
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
    }

    #[test]
    fn rejects_empty_stream() {
        let mut reader = RiffWavReader::new(MemoryStream::new());
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
    }

    #[test]
    fn rejects_inconsistent_block_align() {
        let mut fixture = Fixture::pcm_stereo(2);
        fixture.fmt.block_align = 2;
        let mut reader = fixture.reader();
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
        assert!(reader.format().is_none());
    }

    #[test]
    fn rejects_inconsistent_byte_rate() {
        let mut fixture = Fixture::pcm_stereo(2);
        fixture.fmt.byte_rate = 1000;
        let mut reader = fixture.reader();
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
    }

    #[test]
    fn rejects_short_fmt_chunk() {
        let mut bytes = Fixture::pcm_stereo(2).build();
        bytes[16..20].copy_from_slice(&14u32.to_le_bytes());
        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(bytes));
        assert_eq!(reader.prepare(), Err(WavError::NotRiffWav));
    }

    #[test]
    fn clamps_inflated_data_size() {
        let mut fixture = Fixture::pcm_stereo(3);
        fixture.declared_data = Some(1_000_000);
        let mut reader = fixture.reader();
        reader.prepare().unwrap();
        let window = reader.window().unwrap();
        assert_eq!(window.data_length, 12);
        assert_eq!(window.end(), fixture.build().len() as u64);
    }

    #[test]
    fn keeps_declared_size_when_file_has_trailing_chunks() {
        let mut fixture = Fixture::pcm_stereo(2);
        fixture.post = chunk(b"LIST", b"INFOtail");
        let mut reader = fixture.reader();
        reader.prepare().unwrap();
        assert_eq!(reader.data_length(), Some(8));

        let mut buf = [0u8; 64];
        let read = reader.read_stream(&mut buf, 64).unwrap();
        assert_eq!(read, StreamRead { status: ReadStatus::EndReached, bytes_read: 8 });
        assert_eq!(&buf[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn reads_whole_frames_until_end() {
        let mut reader = Fixture::pcm_stereo(4).reader();
        reader.prepare().unwrap();
        let mut buf = [0u8; 12];

        let read = reader.read_frames(&mut buf, 3).unwrap();
        assert_eq!(read, StreamRead { status: ReadStatus::Ok, bytes_read: 12 });
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);

        let read = reader.read_frames(&mut buf, 3).unwrap();
        assert_eq!(read, StreamRead { status: ReadStatus::EndReached, bytes_read: 4 });
        assert_eq!(&buf[..4], &[12, 13, 14, 15]);

        assert!(matches!(reader.read_frames(&mut buf, 1), Err(WavError::ReadError(_))));
    }

    #[test]
    fn exact_read_to_boundary_reports_end() {
        let mut reader = Fixture::pcm_stereo(2).reader();
        reader.prepare().unwrap();
        let mut buf = [0u8; 8];
        assert!(reader.read_frames(&mut buf, 2).unwrap().is_end());
    }

    #[test]
    fn unprepared_reader_refuses_reads() {
        let mut reader = Fixture::pcm_stereo(2).reader();
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_stream(&mut buf, 0), Err(WavError::NotRiffWav));
        assert_eq!(reader.read_frames(&mut buf, 1), Err(WavError::NotRiffWav));
        assert_eq!(reader.seek_frame(0), Err(WavError::NotRiffWav));
    }

    #[test]
    fn zero_count_read_touches_nothing() {
        let calls = Rc::new(Cell::new(0));
        let stream = CountingStream {
            inner: MemoryStream::from_bytes(Fixture::pcm_stereo(2).build()),
            calls: Rc::clone(&calls),
        };
        let mut reader = RiffWavReader::new(stream);
        reader.prepare().unwrap();

        let before = calls.get();
        let read = reader.read_stream(&mut [], 0).unwrap();
        assert_eq!(read, StreamRead { status: ReadStatus::Ok, bytes_read: 0 });
        assert_eq!(reader.read_frames(&mut [], 0).unwrap().bytes_read, 0);
        assert_eq!(calls.get(), before);
    }

    #[test]
    fn undersized_buffer_is_invalid() {
        let mut reader = Fixture::pcm_stereo(4).reader();
        reader.prepare().unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(reader.read_frames(&mut buf, 2), Err(WavError::InvalidArgument(_))));
        assert!(matches!(reader.read_stream(&mut buf, 5), Err(WavError::InvalidArgument(_))));
    }

    #[test]
    fn empty_data_chunk_is_immediately_exhausted() {
        let mut reader = Fixture::pcm_stereo(0).reader();
        reader.prepare().unwrap();
        assert_eq!(reader.data_length(), Some(0));
        assert!(matches!(reader.read_stream(&mut [0u8; 4], 4), Err(WavError::ReadError(_))));
    }

    #[test]
    fn seek_frame_and_progress() {
        let mut reader = Fixture::pcm_stereo(4).reader();
        reader.prepare().unwrap();
        assert_eq!(reader.remaining_bytes().unwrap(), 16);

        reader.seek_frame(2).unwrap();
        assert_eq!(reader.position_in_window().unwrap(), 8);
        assert_eq!(reader.remaining_bytes().unwrap(), 8);

        let mut buf = [0u8; 4];
        reader.read_frames(&mut buf, 1).unwrap();
        assert_eq!(buf, [8, 9, 10, 11]);

        reader.seek_frame(4).unwrap();
        assert_eq!(reader.remaining_bytes().unwrap(), 0);
        assert!(matches!(reader.seek_frame(5), Err(WavError::InvalidArgument(_))));
    }

    #[test]
    fn reprepare_rewinds_to_data_start() {
        let mut reader = Fixture::pcm_stereo(2).reader();
        reader.prepare().unwrap();
        let mut buf = [0u8; 8];
        reader.read_frames(&mut buf, 2).unwrap();
        reader.prepare().unwrap();
        assert_eq!(reader.position_in_window().unwrap(), 0);
    }

    #[test]
    fn prepares_float_stream() {
        let mut bytes = b"RIFF\0\0\0\0WAVEfmt ".to_vec();
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&48000u32.to_le_bytes());
        bytes.extend_from_slice(&192_000u32.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&32u16.to_le_bytes());
        bytes.extend(chunk(b"data", &0.5f32.to_le_bytes()));

        let mut reader = RiffWavReader::new(MemoryStream::from_bytes(bytes));
        reader.prepare().unwrap();
        assert_eq!(reader.format().unwrap().format_tag(), 3);

        let mut buf = [0u8; 4];
        assert!(reader.read_frames(&mut buf, 1).unwrap().is_end());
        assert_eq!(f32::from_le_bytes(buf), 0.5);
    }
}
