//! Protocol codec
//!
//! Encoding functions for the wire protocol.
//!
//! ## Request Format
//! A request is always an array whose elements are the arguments:
//! ```text
//! *3\r\n$3\r\nSET\r\n$3\r\nkey\r\n:10\r\n
//! ```
//!
//! Text and bytes are always written as bulk strings, even when they contain
//! no `\r\n`, so no payload is ever inspected before it is written.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use super::command::Arg;
use super::frame::{Marker, CRLF};
use super::value::Value;
use crate::error::Result;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request into `dst`
///
/// `None` encodes a null array (`*-1\r\n`).
pub fn encode_request(args: Option<&[Arg]>, dst: &mut BytesMut) {
    match args {
        None => put_header(dst, Marker::Array, -1),
        Some(args) => {
            put_header(dst, Marker::Array, args.len() as i64);
            for arg in args {
                encode_arg(arg, dst);
            }
        }
    }
}

fn encode_arg(arg: &Arg, dst: &mut BytesMut) {
    match arg {
        Arg::Int(i) => put_header(dst, Marker::Integer, *i),
        Arg::Text(s) => put_bulk(dst, s.as_bytes()),
        Arg::Bytes(b) => put_bulk(dst, b),
        Arg::Null => put_header(dst, Marker::BulkString, -1),
        Arg::Array(items) => encode_request(items.as_deref(), dst),
    }
}

/// Write a request to a sink and flush it
///
/// A failure part-way leaves the sink in an undefined state; the connection
/// must be discarded.
pub fn write_request<W: Write>(writer: &mut W, args: Option<&[Arg]>) -> Result<()> {
    let mut buf = BytesMut::new();
    encode_request(args, &mut buf);
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Value Encoding
// =============================================================================

/// Encode a value into `dst` the way a server would send it
pub fn encode_value(value: &Value, dst: &mut BytesMut) {
    match value {
        Value::Null => put_header(dst, Marker::BulkString, -1),
        Value::SimpleString(s) => put_line(dst, Marker::SimpleString, s.as_bytes()),
        Value::Error(e) => put_line(dst, Marker::Error, e.as_bytes()),
        Value::Integer(i) => put_header(dst, Marker::Integer, *i),
        Value::BulkString(b) => put_bulk(dst, b),
        Value::Array(items) => {
            put_header(dst, Marker::Array, items.len() as i64);
            for item in items {
                encode_value(item, dst);
            }
        }
    }
}

/// Write a value to a sink and flush it
pub fn write_value<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    let mut buf = BytesMut::new();
    encode_value(value, &mut buf);
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Frame Writers
// =============================================================================

/// `<marker><decimal>\r\n`
fn put_header(dst: &mut BytesMut, marker: Marker, n: i64) {
    put_line(dst, marker, n.to_string().as_bytes());
}

/// `<marker><text>\r\n`
fn put_line(dst: &mut BytesMut, marker: Marker, text: &[u8]) {
    dst.reserve(1 + text.len() + CRLF.len());
    dst.put_u8(marker as u8);
    dst.put_slice(text);
    dst.put_slice(CRLF);
}

/// `$<len>\r\n<payload>\r\n`
fn put_bulk(dst: &mut BytesMut, payload: &[u8]) {
    put_header(dst, Marker::BulkString, payload.len() as i64);
    dst.reserve(payload.len() + CRLF.len());
    dst.put_slice(payload);
    dst.put_slice(CRLF);
}
