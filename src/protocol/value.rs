//! Value definitions
//!
//! Everything a RESP2 response can carry.

use std::fmt;

use bytes::Bytes;

/// A decoded protocol value
///
/// `Null`, an empty `BulkString` and an empty `Array` are three different
/// things on the wire and stay different here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `$-1` or `*-1`
    Null,

    /// `+OK`, never contains `\r\n`
    SimpleString(String),

    /// `$6\r\nfoobar`, binary safe
    BulkString(Bytes),

    /// `:1000`
    Integer(i64),

    /// `-ERR message`, an error reported by the server
    Error(String),

    /// `*N` followed by N values
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the value kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::SimpleString(_) => "simple string",
            Value::BulkString(_) => "bulk string",
            Value::Integer(_) => "integer",
            Value::Error(_) => "error",
            Value::Array(_) => "array",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::BulkString(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

/// Renders values the way `redis-cli` does
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, indent: usize) -> fmt::Result {
    match value {
        Value::Null => write!(f, "(nil)"),
        Value::SimpleString(s) => write!(f, "{}", s),
        Value::BulkString(b) => write!(f, "{:?}", String::from_utf8_lossy(b)),
        Value::Integer(i) => write!(f, "(integer) {}", i),
        Value::Error(e) => write!(f, "(error) {}", e),
        Value::Array(items) if items.is_empty() => write!(f, "(empty array)"),
        Value::Array(items) => {
            let width = items.len().to_string().len();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                    write!(f, "{:indent$}", "", indent = indent)?;
                }
                let label = format!("{:>width$}) ", i + 1, width = width);
                write!(f, "{}", label)?;
                write_value(f, item, indent + label.len())?;
            }
            Ok(())
        }
    }
}
