//! Command arguments
//!
//! Represents the arguments of a request sent to the server.

use bytes::Bytes;

use super::value::Value;
use crate::error::RespError;

/// One argument of a request
///
/// Integers of every width are widened to 64 bits on the wire. Text and raw
/// bytes are both sent as bulk strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Sent as an integer frame
    Int(i64),

    /// Sent as a bulk string
    Text(String),

    /// Sent as a bulk string
    Bytes(Bytes),

    /// Sent as a nested array, `None` is a null array
    Array(Option<Vec<Arg>>),

    /// Sent as a null bulk string
    Null,
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for Arg {
    fn from(value: isize) -> Self {
        // isize is at most 64 bits on every supported target
        Arg::Int(value as i64)
    }
}

impl TryFrom<u64> for Arg {
    type Error = RespError;

    fn try_from(value: u64) -> Result<Self, RespError> {
        i64::try_from(value).map(Arg::Int).map_err(|_| {
            RespError::Unsupported(format!(
                "unsigned integer {} does not fit in a signed 64-bit integer",
                value
            ))
        })
    }
}

impl TryFrom<usize> for Arg {
    type Error = RespError;

    fn try_from(value: usize) -> Result<Self, RespError> {
        Arg::try_from(value as u64)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Arg::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Arg {
    fn from(value: Bytes) -> Self {
        Arg::Bytes(value)
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(values: Vec<Arg>) -> Self {
        Arg::Array(Some(values))
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

/// Turn a decoded value back into a request argument.
///
/// Error replies have no request-side representation and are rejected.
impl TryFrom<Value> for Arg {
    type Error = RespError;

    fn try_from(value: Value) -> Result<Self, RespError> {
        match value {
            Value::Null => Ok(Arg::Null),
            Value::SimpleString(s) => Ok(Arg::Text(s)),
            Value::BulkString(b) => Ok(Arg::Bytes(b)),
            Value::Integer(i) => Ok(Arg::Int(i)),
            Value::Error(e) => Err(RespError::Unsupported(format!(
                "error value {:?} cannot be sent as a request argument",
                e
            ))),
            Value::Array(items) => items
                .into_iter()
                .map(Arg::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Arg::from),
        }
    }
}

/// Build a `Vec<Arg>` from heterogeneous values
///
/// ```
/// use respwire::{args, protocol::Arg};
///
/// let request = args!["SET", "counter", 10];
/// assert_eq!(request[2], Arg::Int(10));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::protocol::Arg::from($arg)),*]
    };
}
