//! Value decoder
//!
//! Turns frames into values, recursing into arrays.

use std::io::Read;

use bytes::Bytes;

use super::frame::{Frame, Marker};
use super::splitter::{FrameReader, FrameSplitter};
use super::value::Value;
use crate::config::ClientConfig;
use crate::error::{FramingError, RespError, Result};

/// Default bound on array nesting
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Upper bound on the capacity reserved up front for an array
const MAX_PREALLOC: usize = 1024;

/// Decodes one value per call from a blocking byte source
pub struct Decoder<R> {
    frames: FrameReader<R>,
    max_depth: usize,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder with default limits
    pub fn new(source: R) -> Self {
        Self {
            frames: FrameReader::new(source),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create a decoder using the codec limits of a client config
    pub fn with_limits(source: R, config: &ClientConfig) -> Self {
        let splitter =
            FrameSplitter::with_max_bulk_len(config.max_bulk_len).max_line_len(config.max_line_len);
        Self {
            frames: FrameReader::with_splitter(source, splitter, config.read_buffer_size),
            max_depth: config.max_depth,
        }
    }

    /// Decode the next complete value.
    ///
    /// Blocks until the whole value (including every nested array element)
    /// has been read. Any error leaves the stream in an unknown position.
    pub fn decode(&mut self) -> Result<Value> {
        let value = self.decode_nested(0)?;
        tracing::trace!("Decoded {} value", value.kind());
        Ok(value)
    }

    /// Access the frame reader, e.g. to inspect leftover bytes
    pub fn frames(&self) -> &FrameReader<R> {
        &self.frames
    }

    fn decode_nested(&mut self, depth: usize) -> Result<Value> {
        let frame = match self.frames.next_frame()? {
            Some(frame) => frame,
            None if depth == 0 => return Err(RespError::EmptyStream),
            // The stream ended inside an array
            None => {
                return Err(FramingError::TooShort {
                    content: Bytes::new(),
                }
                .into())
            }
        };

        let (marker, payload) = match frame {
            Frame::NullBulk => return Ok(Value::Null),
            Frame::Bulk(bytes) => return Ok(Value::BulkString(bytes)),
            Frame::Line { marker, payload } => (marker, payload),
        };

        match Marker::try_from(marker)? {
            Marker::SimpleString => Ok(Value::SimpleString(into_text(payload, "simple string")?)),
            Marker::Error => Ok(Value::Error(into_text(payload, "error message")?)),
            Marker::Integer => Ok(Value::Integer(parse_i64(&payload, "integer")?)),
            Marker::Array => {
                let len = parse_i64(&payload, "array length")?;
                if len == -1 {
                    return Ok(Value::Null);
                }
                let len = usize::try_from(len).map_err(|_| RespError::InvalidNumber {
                    what: "array length",
                    text: String::from_utf8_lossy(&payload).into_owned(),
                })?;
                if depth >= self.max_depth {
                    return Err(RespError::NestingTooDeep {
                        max: self.max_depth,
                    });
                }

                let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
                for index in 0..len {
                    let item = self
                        .decode_nested(depth + 1)
                        .map_err(|e| RespError::Item {
                            index,
                            source: Box::new(e),
                        })?;
                    items.push(item);
                }
                Ok(Value::Array(items))
            }
            // The splitter resolves every `$` frame into Bulk or NullBulk
            Marker::BulkString => Err(RespError::UnknownMarker(marker)),
        }
    }
}

/// Decode a single value from a complete in-memory buffer
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    Decoder::new(bytes).decode()
}

fn into_text(payload: Bytes, what: &'static str) -> Result<String> {
    String::from_utf8(payload.to_vec()).map_err(|_| RespError::InvalidUtf8(what))
}

fn parse_i64(payload: &[u8], what: &'static str) -> Result<i64> {
    std::str::from_utf8(payload)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| RespError::InvalidNumber {
            what,
            text: String::from_utf8_lossy(payload).into_owned(),
        })
}
