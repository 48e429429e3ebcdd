//! Command line argument parsing for the Parley CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parley - corpus-compiled intent classification and canned responses
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(about = "Compile intent corpora and chat against the trained classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ParleyArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory containing corpus JSON files
    #[arg(long, default_value = "corpora", global = true)]
    pub corpora_dir: PathBuf,

    /// Directory holding compiled artifacts
    #[arg(long, default_value = "models", global = true)]
    pub models_dir: PathBuf,

    /// Seed for shuffling, initialization, and response selection
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ParleyArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compile every corpus in the corpora directory
    Compile(CompileArgs),

    /// Answer a single message against a compiled domain
    Ask(AskArgs),

    /// Interactive chat against a compiled domain
    Chat(ChatArgs),

    /// List compiled domains
    List(ListArgs),
}

/// Arguments for compiling corpora
#[derive(Parser, Debug, Clone)]
pub struct CompileArgs {
    /// Compile only this domain instead of the whole directory
    #[arg(short, long, value_name = "DOMAIN")]
    pub domain: Option<String>,
}

/// Arguments for one-shot inference
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// Domain to classify against
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// The message to answer
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Override the confidence threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for interactive chat
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Domain to classify against
    #[arg(value_name = "DOMAIN")]
    pub domain: String,
}

/// Arguments for listing compiled domains
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile() {
        let args = ParleyArgs::parse_from(["parley", "compile"]);
        assert!(matches!(args.command, Command::Compile(_)));
        assert_eq!(args.verbosity(), 1);
    }

    #[test]
    fn test_parse_ask_with_globals() {
        let args = ParleyArgs::parse_from([
            "parley",
            "ask",
            "general",
            "hello there",
            "--models-dir",
            "artifacts",
        ]);
        match args.command {
            Command::Ask(ask) => {
                assert_eq!(ask.domain, "general");
                assert_eq!(ask.message, "hello there");
            }
            _ => panic!("expected ask command"),
        }
        assert_eq!(args.models_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = ParleyArgs::parse_from(["parley", "-q", "-vvv", "list"]);
        assert_eq!(args.verbosity(), 0);
    }
}
