//! Error types for respwire
//!
//! Provides a unified error type for all operations, plus the framing
//! errors raised while splitting the byte stream into frames.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use bytes::Bytes;
use thiserror::Error;

use crate::protocol::MIN_FRAME_LEN;

/// Result type alias using RespError
pub type Result<T> = std::result::Result<T, RespError>;

/// Unified error type for respwire operations
#[derive(Debug, Error)]
pub enum RespError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Framing Errors (fatal for the stream)
    // -------------------------------------------------------------------------
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("stream was empty")]
    EmptyStream,

    #[error("failed to parse {what}: {text:?}")]
    InvalidNumber { what: &'static str, text: String },

    #[error("unknown type marker: 0x{0:02x}")]
    UnknownMarker(u8),

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("array nesting exceeds the limit of {max} levels")]
    NestingTooDeep { max: usize },

    #[error("failed to read item {index} from array: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<RespError>,
    },

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("unsupported value: {0}")]
    Unsupported(String),

    // -------------------------------------------------------------------------
    // Accessor Errors
    // -------------------------------------------------------------------------
    /// An error reply sent by the server, surfaced verbatim
    #[error("{0}")]
    Server(String),

    #[error("content is not {expected}: {found}")]
    TypeMismatch { expected: &'static str, found: String },

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection to {0} is broken by an earlier error")]
    Broken(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RespError {
    /// True when the stream is unusable and the connection must be discarded.
    ///
    /// Accessor errors and `Unsupported` are raised before anything reaches
    /// the wire (or after a full response was read), so they leave the
    /// connection intact.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RespError::Server(_)
                | RespError::TypeMismatch { .. }
                | RespError::Unsupported(_)
                | RespError::Config(_)
        )
    }
}

/// Errors raised while cutting the byte stream into frames.
///
/// Every variant that stems from unexpected bytes keeps those bytes so the
/// stream can be diagnosed after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error(
        "unexpected end of stream, a frame needs at least {} bytes to be valid, actual content in base64: [{}]",
        MIN_FRAME_LEN,
        base64_content(.content)
    )]
    TooShort { content: Bytes },

    #[error(
        "unexpected end of stream, there should have been a \\r\\n before the end, actual content in base64: [{}]",
        base64_content(.content)
    )]
    MissingTerminator { content: Bytes },

    #[error(
        "frame has no type marker, actual content in base64: [{}]",
        base64_content(.content)
    )]
    EmptyFrame { content: Bytes },

    #[error(
        "frame starts as bulk string but length is not a valid int, actual content in base64: [{}]",
        base64_content(.content)
    )]
    InvalidLength { content: Bytes },

    #[error("bulk string of {len} bytes exceeds the limit of {max} bytes")]
    BulkTooLarge { len: usize, max: usize },

    #[error("line frame of at least {len} bytes exceeds the limit of {max} bytes")]
    LineTooLong { len: usize, max: usize },

    #[error(
        "bulk string payload is not followed by \\r\\n, actual content in base64: [{}]",
        base64_content(.content)
    )]
    UnterminatedBulk { content: Bytes },

    #[error(
        "unexpected end of stream, stream ends before bulk string has ended, expected there to be {expected} total bytes but there were only {actual}, actual content in base64: [{}]",
        base64_content(.content)
    )]
    IncompleteBulk {
        expected: usize,
        actual: usize,
        content: Bytes,
    },
}

impl FramingError {
    /// The raw bytes that triggered the error, when the variant carries any
    pub fn content(&self) -> Option<&Bytes> {
        match self {
            FramingError::TooShort { content }
            | FramingError::MissingTerminator { content }
            | FramingError::EmptyFrame { content }
            | FramingError::InvalidLength { content }
            | FramingError::UnterminatedBulk { content }
            | FramingError::IncompleteBulk { content, .. } => Some(content),
            FramingError::BulkTooLarge { .. } | FramingError::LineTooLong { .. } => None,
        }
    }
}

fn base64_content(content: &[u8]) -> String {
    STANDARD_NO_PAD.encode(content)
}
