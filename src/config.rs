//! Configuration for respwire
//!
//! Centralized client configuration with sensible defaults.

use crate::error::{RespError, Result};
use crate::protocol::{
    DEFAULT_MAX_BULK_LEN, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LINE_LEN, DEFAULT_READ_SIZE,
};

/// Main configuration for a respwire client connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port). IPv4 addresses are tried first.
    pub addr: String,

    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds), 0 blocks indefinitely
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds), 0 blocks indefinitely
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Bytes requested from the socket per refill of the read buffer
    pub read_buffer_size: usize,

    /// Largest bulk string length accepted from the server (in bytes)
    pub max_bulk_len: usize,

    /// Largest line frame accepted from the server, terminator excluded
    pub max_line_len: usize,

    /// Deepest array nesting accepted from the server
    pub max_depth: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            read_buffer_size: DEFAULT_READ_SIZE,
            max_bulk_len: DEFAULT_MAX_BULK_LEN,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Check that the configuration can drive a connection
    pub fn validate(&self) -> Result<()> {
        if self.addr.trim().is_empty() {
            return Err(RespError::Config("server address is empty".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(RespError::Config(
                "read buffer size must be greater than zero".to_string(),
            ));
        }
        if self.max_line_len == 0 {
            return Err(RespError::Config(
                "max line length must be greater than zero".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(RespError::Config(
                "max nesting depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server address
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the per-refill read size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Set the largest accepted bulk string (in bytes)
    pub fn max_bulk_len(mut self, len: usize) -> Self {
        self.config.max_bulk_len = len;
        self
    }

    /// Set the largest accepted line frame (in bytes)
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    /// Set the deepest accepted array nesting
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
