use clap::{Parser, Subcommand};
use humanizer::pipeline::Tone;
use std::path::PathBuf;

/// `humanizer` - rewrite machine-generated text so it reads naturally.
#[derive(Parser, Debug)]
#[command(name = "humanizer")]
#[command(version)]
#[command(
    about = "Grammar correction, tone rewriting, AI-detection and plagiarism scoring.",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: ~/.humanizer/config.toml, created on first run)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to (overrides config and environment)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Convert text once and print the result as JSON
    Convert {
        /// formal, casual or balanced
        #[arg(short, long, default_value = "balanced")]
        tone: Tone,

        /// Skip AI-detection scoring
        #[arg(long)]
        no_detection: bool,

        /// Skip plagiarism scoring
        #[arg(long)]
        no_plagiarism: bool,

        /// Allow hedges and fillers that go beyond meaning-preserving edits
        #[arg(long)]
        allow_rewording: bool,

        /// Text to convert; `-` or nothing reads stdin
        text: Option<String>,
    },
}
