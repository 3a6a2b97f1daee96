//! Network Module
//!
//! TCP client handling.
//!
//! ## Model
//! - One blocking connection per `Client`
//! - One outstanding request at a time (no pipelining)
//! - Timeouts live on the socket, never in the codec

mod connection;

pub use connection::Client;
