//! Command Line Interface for the Parley conversational agent.

pub mod args;
pub mod commands;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
