//! Tokenizer trait and implementations.
//!
//! Tokenizers are the first step of the analysis pipeline, splitting input
//! text into word tokens. The pipeline ships a single general-purpose
//! implementation, [`word::WordTokenizer`], which splits on Unicode word
//! boundaries; corpora never define their own tokenization rules.
//!
//! # Examples
//!
//! ```
//! use parley::analysis::tokenizer::Tokenizer;
//! use parley::analysis::tokenizer::word::WordTokenizer;
//!
//! let tokenizer = WordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so analyzers can be shared across
/// threads once artifacts are loaded.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod word;
