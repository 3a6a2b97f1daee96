//! # respwire
//!
//! A client-side codec for the REdis SERialization Protocol with:
//! - Streaming frame splitting over arbitrarily fragmented input
//! - Recursive decoding of nested arrays into a tagged [`Value`]
//! - Length-prefixed encoding of request arguments
//! - Typed accessors that never hide a server error
//! - A blocking TCP client, one request/response at a time
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Client::send(args)                       │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!                │                              │
//!                ▼                              │
//!   ┌────────────────────────┐     ┌────────────┴───────────┐
//!   │        Encoder         │     │        Decoder         │
//!   │  (args → array frame)  │     │ (frames → Value, recur)│
//!   └────────────┬───────────┘     └────────────▲───────────┘
//!                │                              │
//!                │                 ┌────────────┴───────────┐
//!                │                 │     Frame Splitter     │
//!                │                 │ (bytes → whole frames) │
//!                │                 └────────────▲───────────┘
//!                ▼                              │
//! ┌─────────────────────────────────────────────┴───────────────┐
//! │                         TcpStream                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use respwire::protocol::{decode_value, Value};
//!
//! let value = decode_value(b"*2\r\n:1\r\n$3\r\nfoo\r\n").unwrap();
//! let items = value.as_array().unwrap().unwrap();
//! assert_eq!(items[0], Value::Integer(1));
//! assert_eq!(items[1].as_string().unwrap(), ("foo", false));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FramingError, RespError, Result};
pub use config::ClientConfig;
pub use network::Client;
pub use protocol::{Arg, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of respwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
