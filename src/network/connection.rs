//! Client Connection
//!
//! Owns one TCP connection and runs one request/response exchange at a time.

use std::io::{BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{RespError, Result};
use crate::protocol::{write_request, Arg, Decoder, Value};

/// A blocking client bound to a single connection
///
/// Not meant to be shared: open one `Client` per concurrent caller. After any
/// fatal error the connection position is unknown, so every later `send`
/// fails with [`RespError::Broken`] and the client should be dropped.
pub struct Client {
    /// Decoder over the read half (buffers internally)
    decoder: Decoder<TcpStream>,

    /// Buffered write half
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Set once a fatal error left the stream mid-frame
    broken: bool,
}

impl Client {
    /// Connect to the server named in `config`
    ///
    /// IPv4 addresses are tried before IPv6 ones; the first that accepts
    /// within the connect timeout wins.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let stream = dial(&config.addr, config.connect_timeout_ms)?;
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| config.addr.clone());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            decoder: Decoder::with_limits(read_stream, config),
            writer: BufWriter::new(write_stream),
            peer_addr,
            broken: false,
        })
    }

    /// Send one request and block until its response is decoded.
    ///
    /// An `Error` reply is returned as `Ok(Value::Error(..))`; use the
    /// accessors on [`Value`] to turn it into a failure.
    pub fn send(&mut self, args: &[Arg]) -> Result<Value> {
        if self.broken {
            return Err(RespError::Broken(self.peer_addr.clone()));
        }

        let command = describe(args);
        tracing::trace!("Sending {} to {}", command, self.peer_addr);

        if let Err(e) = write_request(&mut self.writer, Some(args)) {
            tracing::warn!("Failed to send {} to {}: {}", command, self.peer_addr, e);
            self.broken = e.is_fatal();
            return Err(e);
        }

        match self.decoder.decode() {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    "Failed to read response to {} from {}: {}",
                    command,
                    self.peer_addr,
                    e
                );
                self.broken = e.is_fatal();
                Err(e)
            }
        }
    }

    /// True once a fatal error made the connection unusable
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Shut the connection down in both directions
    pub fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => {}
            // Peer already went away
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!("Closed connection to {}", self.peer_addr);
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Resolve `addr` and connect to the first reachable address
fn dial(addr: &str, timeout_ms: u64) -> Result<TcpStream> {
    let connect_err = |source| RespError::Connect {
        addr: addr.to_string(),
        source,
    };

    let mut candidates: Vec<SocketAddr> = addr.to_socket_addrs().map_err(connect_err)?.collect();
    // Stable sort keeps resolver order within each family
    candidates.sort_by_key(|candidate| !candidate.is_ipv4());

    let mut last_err = None;
    for candidate in candidates {
        let attempt = if timeout_ms > 0 {
            TcpStream::connect_timeout(&candidate, Duration::from_millis(timeout_ms))
        } else {
            TcpStream::connect(candidate)
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", candidate, e);
                last_err = Some(e);
            }
        }
    }

    Err(connect_err(last_err.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "address resolved to no socket addresses",
        )
    })))
}

/// The command name for logging, e.g. `SET`
fn describe(args: &[Arg]) -> String {
    match args.first() {
        Some(Arg::Text(name)) => name.clone(),
        Some(Arg::Bytes(name)) => String::from_utf8_lossy(name).into_owned(),
        Some(other) => format!("{:?}", other),
        None => "<empty request>".to_string(),
    }
}
