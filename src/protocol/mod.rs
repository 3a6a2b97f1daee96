//! Protocol Module
//!
//! Client-side codec for the REdis SERialization Protocol (RESP2).
//!
//! ## Wire Format
//!
//! Every frame starts with a one byte type marker. All frames except bulk
//! strings end at the first `\r\n`; bulk strings declare their length up front
//! so the payload may contain `\r\n` itself.
//!
//! ```text
//! +OK\r\n                      simple string
//! -ERR unknown command\r\n     error
//! :1000\r\n                    integer
//! $6\r\nfoobar\r\n             bulk string ($-1\r\n is null)
//! *2\r\n:1\r\n:2\r\n           array of 2 values (*-1\r\n is null)
//! ```
//!
//! ## Layers
//! - `splitter`: cuts a fragmented byte stream into complete frames
//! - `decoder`:  turns frames into [`Value`]s, recursing into arrays
//! - `codec`:    encodes request arguments (and values) back to bytes
//! - `response`: typed accessors over a decoded [`Value`]

mod command;
mod codec;
mod decoder;
mod frame;
mod response;
mod splitter;
mod value;

pub use command::Arg;
pub use codec::{encode_request, encode_value, write_request, write_value};
pub use decoder::{decode_value, Decoder, DEFAULT_MAX_DEPTH};
pub use frame::{Frame, Marker, CRLF, MIN_FRAME_LEN};
pub use splitter::{
    FrameReader, FrameSplitter, Split, DEFAULT_MAX_BULK_LEN, DEFAULT_MAX_LINE_LEN,
    DEFAULT_READ_SIZE,
};
pub use value::Value;
