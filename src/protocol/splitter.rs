//! Frame splitter
//!
//! Cuts an accumulating byte buffer into complete frames.
//!
//! The splitter never emits a partial frame. Each call on a buffer ends in
//! exactly one of:
//! - `Split::Incomplete`: nothing can be decided yet, append more bytes and retry
//! - `Split::Complete`:   one frame, its bytes already removed from the buffer
//! - `FramingError`:      the stream is broken and cannot recover
//!
//! Line frames end at the first `\r\n`. Bulk strings switch to length-based
//! framing: once `$<len>\r\n` is read, the splitter waits until `len + 2` more
//! bytes are buffered instead of searching for a terminator, because the
//! payload may contain `\r\n` itself.
//!
//! Lines are bounded by `max_line_len`. A reader that refills the buffer
//! passes a scan cursor so each byte is searched for a terminator once.

use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};

use super::frame::{Frame, Marker, CRLF, MIN_FRAME_LEN};
use crate::error::{FramingError, Result};

/// Default bound on a declared bulk string length (512 MB)
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Default bound on a line frame, terminator excluded (64 KB)
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Default number of bytes requested from the source per refill
pub const DEFAULT_READ_SIZE: usize = 10 * 1024;

/// Outcome of one split attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    /// More bytes are needed before a frame can be cut
    Incomplete,

    /// A complete frame. `consumed` bytes have been removed from the buffer.
    Complete { frame: Frame, consumed: usize },
}

/// Stateless splitter over a caller-owned buffer
#[derive(Debug, Clone, Copy)]
pub struct FrameSplitter {
    max_bulk_len: usize,
    max_line_len: usize,
}

impl Default for FrameSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSplitter {
    /// Create a splitter with the default length bounds
    pub fn new() -> Self {
        Self {
            max_bulk_len: DEFAULT_MAX_BULK_LEN,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }

    /// Create a splitter that rejects bulk strings longer than `max_bulk_len`
    pub fn with_max_bulk_len(max_bulk_len: usize) -> Self {
        Self {
            max_bulk_len,
            ..Self::new()
        }
    }

    /// Reject line frames longer than `max_line_len` bytes
    pub fn max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Try to cut one frame from the front of `buf`.
    ///
    /// `at_eof` tells the splitter no more bytes will ever arrive, which turns
    /// every "need more" condition into a framing error. The buffer is left
    /// untouched unless a frame is returned.
    pub fn split(&self, buf: &mut BytesMut, at_eof: bool) -> std::result::Result<Split, FramingError> {
        let mut scanned = 0;
        self.split_from(buf, &mut scanned, at_eof)
    }

    /// Like [`FrameSplitter::split`], but resumes the terminator search.
    ///
    /// `scanned` counts the leading bytes of `buf` already known to hold no
    /// `\r\n`. It is advanced on `Incomplete` and reset to zero otherwise, so
    /// the caller only has to keep it alongside the buffer.
    pub fn split_from(
        &self,
        buf: &mut BytesMut,
        scanned: &mut usize,
        at_eof: bool,
    ) -> std::result::Result<Split, FramingError> {
        let result = self.split_inner(buf, scanned, at_eof);
        if !matches!(result, Ok(Split::Incomplete)) {
            *scanned = 0;
        }
        result
    }

    fn split_inner(
        &self,
        buf: &mut BytesMut,
        scanned: &mut usize,
        at_eof: bool,
    ) -> std::result::Result<Split, FramingError> {
        if buf.len() < MIN_FRAME_LEN {
            if at_eof {
                return Err(FramingError::TooShort {
                    content: Bytes::copy_from_slice(buf),
                });
            }
            return Ok(Split::Incomplete);
        }

        let found = match find_crlf(buf, *scanned) {
            Some(pos) => pos,
            None => {
                // A trailing `\r` may still pair with the next byte
                let line_len = buf.len() - usize::from(buf.ends_with(b"\r"));
                if line_len > self.max_line_len {
                    return Err(FramingError::LineTooLong {
                        len: line_len,
                        max: self.max_line_len,
                    });
                }
                if at_eof {
                    return Err(FramingError::MissingTerminator {
                        content: Bytes::copy_from_slice(buf),
                    });
                }
                *scanned = line_len;
                return Ok(Split::Incomplete);
            }
        };

        if found > self.max_line_len {
            return Err(FramingError::LineTooLong {
                len: found,
                max: self.max_line_len,
            });
        }

        if found == 0 {
            return Err(FramingError::EmptyFrame {
                content: Bytes::copy_from_slice(&buf[..2]),
            });
        }

        if buf[0] == Marker::BulkString as u8 {
            return self.split_bulk(buf, found, at_eof);
        }

        let consumed = found + CRLF.len();
        let line = buf.split_to(consumed).freeze();
        let frame = Frame::Line {
            marker: line[0],
            payload: line.slice(1..found),
        };

        tracing::trace!("Split line frame of {} bytes", consumed);
        Ok(Split::Complete { frame, consumed })
    }

    /// Resolve a bulk string whose length line ends at `found`
    fn split_bulk(
        &self,
        buf: &mut BytesMut,
        found: usize,
        at_eof: bool,
    ) -> std::result::Result<Split, FramingError> {
        let declared = parse_length(&buf[1..found]).ok_or_else(|| FramingError::InvalidLength {
            content: Bytes::copy_from_slice(&buf[..found]),
        })?;

        if declared == -1 {
            let consumed = found + CRLF.len();
            buf.advance(consumed);
            return Ok(Split::Complete {
                frame: Frame::NullBulk,
                consumed,
            });
        }

        let len = usize::try_from(declared).map_err(|_| FramingError::InvalidLength {
            content: Bytes::copy_from_slice(&buf[..found]),
        })?;

        if len > self.max_bulk_len {
            return Err(FramingError::BulkTooLarge {
                len,
                max: self.max_bulk_len,
            });
        }

        // Length line, payload, and the two terminators
        let expected = found.saturating_add(len).saturating_add(2 * CRLF.len());

        if buf.len() < expected {
            if at_eof {
                return Err(FramingError::IncompleteBulk {
                    expected,
                    actual: buf.len(),
                    content: Bytes::copy_from_slice(buf),
                });
            }
            return Ok(Split::Incomplete);
        }

        if &buf[expected - CRLF.len()..expected] != CRLF {
            return Err(FramingError::UnterminatedBulk {
                content: Bytes::copy_from_slice(&buf[..expected]),
            });
        }

        let start = found + CRLF.len();
        let raw = buf.split_to(expected).freeze();
        let payload = raw.slice(start..expected - CRLF.len());

        tracing::trace!("Split bulk frame with {} byte payload", len);
        Ok(Split::Complete {
            frame: Frame::Bulk(payload),
            consumed: expected,
        })
    }
}

/// Position of the first `\r\n` in `data` at or after `from`
fn find_crlf(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .map(|pos| from + pos)
}

/// Parse a signed decimal length
fn parse_length(digits: &[u8]) -> Option<i64> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

// =============================================================================
// Frame Reader
// =============================================================================

/// Drives a [`FrameSplitter`] over a blocking byte source.
///
/// Owns the read buffer, so bytes that belong to the next frame (or the next
/// response) stay buffered between calls.
pub struct FrameReader<R> {
    source: R,
    buffer: BytesMut,
    splitter: FrameSplitter,
    read_size: usize,
    scanned: usize,
    at_eof: bool,
}

impl<R: Read> FrameReader<R> {
    /// Create a reader with default limits
    pub fn new(source: R) -> Self {
        Self::with_splitter(source, FrameSplitter::new(), DEFAULT_READ_SIZE)
    }

    /// Create a reader with an explicit splitter and refill size
    pub fn with_splitter(source: R, splitter: FrameSplitter, read_size: usize) -> Self {
        let read_size = read_size.max(MIN_FRAME_LEN);
        Self {
            source,
            buffer: BytesMut::with_capacity(read_size),
            splitter,
            read_size,
            scanned: 0,
            at_eof: false,
        }
    }

    /// Read the next complete frame.
    ///
    /// Blocks until a frame is available. Returns `Ok(None)` only when the
    /// source is exhausted and no bytes are left buffered.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if self.at_eof && self.buffer.is_empty() {
                return Ok(None);
            }

            let before = self.buffer.len();
            match self
                .splitter
                .split_from(&mut self.buffer, &mut self.scanned, self.at_eof)?
            {
                Split::Complete { frame, consumed } => {
                    debug_assert_eq!(before - self.buffer.len(), consumed);
                    return Ok(Some(frame));
                }
                Split::Incomplete => self.fill()?,
            }
        }
    }

    /// True once the source has reported end-of-stream
    pub fn is_eof(&self) -> bool {
        self.at_eof
    }

    /// Number of bytes read from the source but not yet framed
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Get a reference to the underlying source
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Append at most `read_size` bytes from the source to the buffer
    fn fill(&mut self) -> Result<()> {
        let start = self.buffer.len();
        self.buffer.resize(start + self.read_size, 0);

        loop {
            match self.source.read(&mut self.buffer[start..]) {
                Ok(0) => {
                    self.buffer.truncate(start);
                    self.at_eof = true;
                    tracing::debug!("Source reached end of stream with {} bytes buffered", start);
                    return Ok(());
                }
                Ok(n) => {
                    self.buffer.truncate(start + n);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.truncate(start);
                    return Err(e.into());
                }
            }
        }
    }
}
