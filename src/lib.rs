//! # Parley
//!
//! A small conversational-agent core for Rust: compile a labeled corpus of
//! intents into a bag-of-words vocabulary and a trained feed-forward
//! classifier, then answer free-text messages with canned responses drawn
//! from the best-matching intent.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Deterministic corpus compilation (seedable shuffling and initialization)
//! - Pluggable artifact storage backends
//! - Tagged match/no-match inference results (no crash paths)
//! - Seedable response selection for reproducible tests

pub mod analysis;
pub mod artifact;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod nn;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
