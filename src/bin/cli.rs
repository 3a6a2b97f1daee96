//! respwire CLI Client
//!
//! Command-line interface for sending commands to a RESP server.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use respwire::{Arg, Client, ClientConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// respwire CLI
#[derive(Parser, Debug)]
#[command(name = "respwire-cli")]
#[command(about = "CLI for RESP key-value stores")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Ping the server
    Ping,

    /// Send an arbitrary command, e.g. `raw INCRBY counter 5`
    Raw {
        /// Command name followed by its arguments
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },
}

impl Commands {
    fn into_args(self) -> Vec<Arg> {
        match self {
            Commands::Get { key } => respwire::args!["GET", key],
            Commands::Set { key, value } => respwire::args!["SET", key, value],
            Commands::Del { key } => respwire::args!["DEL", key],
            Commands::Ping => respwire::args!["PING"],
            Commands::Raw { args } => args.into_iter().map(Arg::from).collect(),
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .addr(&args.server)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    let mut client = match Client::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Could not connect to {}: {}", args.server, e);
            return ExitCode::FAILURE;
        }
    };

    let response = match client.send(&args.command.into_args()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Request failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", response);

    if let Err(e) = client.close() {
        tracing::warn!("Error closing connection: {}", e);
    }

    if response.as_error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
