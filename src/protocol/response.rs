//! Response accessors
//!
//! Typed projections over a decoded [`Value`]. An `Error` reply is always
//! surfaced as [`RespError::Server`] before any type check, so a server
//! failure can never be mistaken for a type mismatch.

use super::value::Value;
use crate::error::{RespError, Result};

impl Value {
    /// The error message if this is an error reply
    pub fn as_error(&self) -> Option<&str> {
        match self {
            Value::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Fail with the server's message if this is an error reply
    pub fn check_error(&self) -> Result<()> {
        match self.as_error() {
            Some(message) => Err(RespError::Server(message.to_string())),
            None => Ok(()),
        }
    }

    /// True for `Null` only; empty strings and arrays are not null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The integer content
    pub fn as_integer(&self) -> Result<i64> {
        self.check_error()?;
        match self {
            Value::Integer(i) => Ok(*i),
            other => Err(mismatch("an integer", other)),
        }
    }

    /// The string content and whether the value was null.
    ///
    /// `Null` yields `("", true)`. Bulk strings must be valid UTF-8; use
    /// [`Value::as_bytes`] for binary payloads.
    pub fn as_string(&self) -> Result<(&str, bool)> {
        self.check_error()?;
        match self {
            Value::Null => Ok(("", true)),
            Value::SimpleString(s) => Ok((s.as_str(), false)),
            Value::BulkString(b) => std::str::from_utf8(b)
                .map(|s| (s, false))
                .map_err(|_| mismatch("a UTF-8 string", self)),
            other => Err(mismatch("a string", other)),
        }
    }

    /// The raw string content and whether the value was null
    pub fn as_bytes(&self) -> Result<(&[u8], bool)> {
        self.check_error()?;
        match self {
            Value::Null => Ok((&[][..], true)),
            Value::SimpleString(s) => Ok((s.as_bytes(), false)),
            Value::BulkString(b) => Ok((&b[..], false)),
            other => Err(mismatch("a string", other)),
        }
    }

    /// The array elements, `None` for a null array
    pub fn as_array(&self) -> Result<Option<&[Value]>> {
        self.check_error()?;
        match self {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(items.as_slice())),
            other => Err(mismatch("an array", other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> RespError {
    RespError::TypeMismatch {
        expected,
        found: format!("{:?}", found),
    }
}
