//! The normalization pipeline applied to patterns and messages alike.
//!
//! A [`MessageAnalyzer`] owns a tokenizer, a lemmatizer, and the ignore set,
//! and turns raw text into the lemma sequence everything downstream works
//! with. The compiler uses it to build vocabularies; the engine uses the
//! same instance (or one built from the same config) to encode messages, so
//! a token normalizes identically on both sides.
//!
//! # Examples
//!
//! ```
//! use parley::analysis::analyzer::MessageAnalyzer;
//!
//! let analyzer = MessageAnalyzer::new();
//! let lemmas = analyzer.analyze("Hello, worlds!").unwrap();
//! assert_eq!(lemmas, vec!["hello".to_string(), "world".to_string()]);
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::analysis::lemmatizer::{EnglishLemmatizer, Lemmatizer};
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::word::WordTokenizer;
use crate::error::Result;

/// Tokenize → ignore-set filter → lowercase → lemmatize.
pub struct MessageAnalyzer {
    tokenizer: Box<dyn Tokenizer>,
    lemmatizer: Box<dyn Lemmatizer>,
    ignore: HashSet<String>,
}

impl fmt::Debug for MessageAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("lemmatizer", &self.lemmatizer.name())
            .field("ignore_len", &self.ignore.len())
            .finish()
    }
}

impl Default for MessageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageAnalyzer {
    /// Create an analyzer with the default tokenizer and lemmatizer and an
    /// empty ignore set.
    pub fn new() -> Self {
        MessageAnalyzer {
            tokenizer: Box::new(WordTokenizer::new()),
            lemmatizer: Box::new(EnglishLemmatizer::new()),
            ignore: HashSet::new(),
        }
    }

    /// Create an analyzer with the given ignore set.
    pub fn with_ignore_tokens<I, S>(ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MessageAnalyzer {
            ignore: ignore.into_iter().map(|s| s.into()).collect(),
            ..Self::new()
        }
    }

    /// Replace the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the lemmatizer.
    pub fn with_lemmatizer(mut self, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    /// Normalize text into its lemma sequence.
    ///
    /// Tokens in the ignore set are dropped before lowercasing, matching the
    /// exclusion applied when the vocabulary was built.
    pub fn analyze(&self, text: &str) -> Result<Vec<String>> {
        let lemmas = self
            .tokenizer
            .tokenize(text)?
            .filter(|token| !self.ignore.contains(&token.text))
            .map(|token| self.lemmatizer.lemmatize(&token.text.to_lowercase()))
            .collect();
        Ok(lemmas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_lowercases_and_lemmatizes() {
        let analyzer = MessageAnalyzer::new();
        let lemmas = analyzer.analyze("The Cats SAT").unwrap();
        assert_eq!(lemmas, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn test_analyze_drops_ignore_tokens() {
        let analyzer = MessageAnalyzer::with_ignore_tokens(["lol"]);
        let lemmas = analyzer.analyze("hello lol world").unwrap();
        assert_eq!(lemmas, vec!["hello", "world"]);
    }

    #[test]
    fn test_analyze_empty_input() {
        let analyzer = MessageAnalyzer::new();
        assert!(analyzer.analyze("").unwrap().is_empty());
        assert!(analyzer.analyze("?!...").unwrap().is_empty());
    }
}
