use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lingua LLM request translator
#[derive(Debug, Parser)]
#[command(name = "lingua", about = "Translate LLM requests and responses between provider formats")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "LINGUA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log filter
    #[arg(long, global = true, env = "LINGUA_LOG")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered providers with their capabilities
    Providers,

    /// Validate a canonical request and print the provider payload
    Translate {
        /// Target provider; taken from the request or config when omitted
        #[arg(short, long)]
        provider: Option<String>,

        /// Canonical request JSON file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        request: PathBuf,

        /// Print the endpoint and model next to the payload
        #[arg(long)]
        with_connection: bool,
    },

    /// Convert a provider response into a canonical response
    Response {
        /// Provider that produced the response
        #[arg(short, long)]
        provider: String,

        /// Provider response JSON file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Convert provider stream chunks, one per line, into canonical deltas
    Stream {
        /// Provider that produced the stream
        #[arg(short, long)]
        provider: String,

        /// Stream capture file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
}
