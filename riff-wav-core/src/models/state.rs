/// Writer lifecycle.
///
/// State transitions:
/// ```text
/// header_pending → streaming → finalized
///                                 ↺ (finalize again, same bytes)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterState {
    #[default]
    HeaderPending,
    Streaming,
    Finalized,
}

impl WriterState {
    pub fn is_header_pending(&self) -> bool {
        matches!(self, Self::HeaderPending)
    }

    /// Sample bytes may be appended.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }

    /// The header has been emitted, so size fields can be patched.
    pub fn can_finalize(&self) -> bool {
        matches!(self, Self::Streaming | Self::Finalized)
    }
}

/// Outcome of a successful streaming read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// More sample data remains in the window.
    Ok,
    /// This call reached or crossed the end of the window.
    EndReached,
}

/// Bytes moved by a streaming read together with its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRead {
    pub status: ReadStatus,
    pub bytes_read: usize,
}

impl StreamRead {
    pub(crate) fn empty() -> Self {
        Self { status: ReadStatus::Ok, bytes_read: 0 }
    }

    pub fn is_end(&self) -> bool {
        self.status == ReadStatus::EndReached
    }
}
