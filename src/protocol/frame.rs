//! Frame definitions
//!
//! Type markers and the frames produced by the splitter.

use bytes::Bytes;

use crate::error::RespError;

/// Terminator ending every line and every bulk payload
pub const CRLF: &[u8; 2] = b"\r\n";

/// Bytes that must be buffered before the splitter decides anything
pub const MIN_FRAME_LEN: usize = 3;

/// Frame type markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Marker {
    SimpleString = b'+',
    Error = b'-',
    Integer = b':',
    BulkString = b'$',
    Array = b'*',
}

impl TryFrom<u8> for Marker {
    type Error = RespError;

    fn try_from(byte: u8) -> Result<Self, RespError> {
        match byte {
            b'+' => Ok(Marker::SimpleString),
            b'-' => Ok(Marker::Error),
            b':' => Ok(Marker::Integer),
            b'$' => Ok(Marker::BulkString),
            b'*' => Ok(Marker::Array),
            other => Err(RespError::UnknownMarker(other)),
        }
    }
}

/// One complete frame cut from the stream.
///
/// Bulk strings arrive with their length already resolved, so the payload is
/// exactly the declared bytes and the length prefix is never seen again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A terminator-delimited line: the marker byte and everything after it up
    /// to (not including) the `\r\n`
    Line { marker: u8, payload: Bytes },

    /// A length-prefixed bulk string, possibly empty
    Bulk(Bytes),

    /// `$-1\r\n`
    NullBulk,
}
