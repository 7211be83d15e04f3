//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Read configuration from this file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Petriscope - edit, render and fire Petri nets
#[derive(Parser, Debug)]
#[command(name = "petriscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the default net
    #[command(
        name = "default",
        long_about = "Print the default net as JSON.\n\n\
            This is the net every interactive session starts from: five places, \
            four transitions and a single token on p1. Use it as a template for \
            new nets."
    )]
    Default,

    /// Check a net file
    #[command(
        name = "validate",
        long_about = "Parse and validate a net file.\n\n\
            Reports malformed JSON with its position, and lists every \
            referential problem at once: duplicate ids, arcs whose endpoints \
            do not exist or point the wrong way, and tokens on unknown places.",
        after_help = "\
EXAMPLES:
    petriscope validate net.json
    petriscope validate - < net.json"
    )]
    Validate {
        /// Net file, or - for stdin
        file: PathBuf,
    },

    /// Print graph-component input for a net
    #[command(
        name = "render",
        long_about = "Print the input handed to the graph component: elements, \
            the style table and the layout descriptor, as JSON."
    )]
    Render {
        /// Net file, or - for stdin
        file: PathBuf,
    },

    /// Print token counts per place
    #[command(name = "marking")]
    Marking {
        /// Net file, or - for stdin
        file: PathBuf,

        /// Also list transitions whose input places all hold a token
        #[arg(long)]
        enabled: bool,
    },

    /// Fire a net once
    #[command(
        name = "fire",
        long_about = "Send a net to a fire backend and print the next net.\n\n\
            With a local module (from --module or the config file) the module \
            is loaded first; if that succeeds it serves the request. Otherwise \
            the request goes to the remote fire service.",
        after_help = "\
EXAMPLES:
    # Fire through the configured service
    petriscope fire net.json

    # Use a specific service
    petriscope fire net.json --endpoint http://localhost:9000/fire

    # Use a compiled module and update the file in place
    petriscope fire net.json --module ./libpetri_fire.so --write"
    )]
    Fire {
        /// Net file, or - for stdin
        file: PathBuf,

        /// Fire service URL (overrides config)
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Local fire module (overrides config)
        #[arg(long, value_name = "PATH")]
        module: Option<PathBuf>,

        /// Write the next net back to FILE instead of printing it
        #[arg(long)]
        write: bool,
    },

    /// Run an interactive session on stdin
    #[command(
        name = "session",
        long_about = "Run a headless editing session.\n\n\
            The session starts from FILE (or the default net), prints the graph \
            outline and then reads commands from stdin, one per line:\n\n\
            \x20   fire          fire the current net\n\
            \x20   load <file>   replace the editor text with the file contents\n\
            \x20   show          print the current net\n\
            \x20   quit          end the session"
    )]
    Session {
        /// Starting net (defaults to the built-in net)
        file: Option<PathBuf>,

        /// Fire service URL (overrides config)
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Local fire module (overrides config)
        #[arg(long, value_name = "PATH")]
        module: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    petriscope completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    petriscope completion zsh >> ~/.zshrc

    # Fish
    petriscope completion fish > ~/.config/fish/completions/petriscope.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
