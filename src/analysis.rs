//! Text analysis shared by the corpus compiler and the inference engine.
//!
//! Both subsystems must normalize text identically, or vocabulary slots
//! built at compile time will never light up at inference time. The shared
//! pipeline is: tokenize on word boundaries, drop ignore-set tokens,
//! lowercase, lemmatize. [`analyzer::MessageAnalyzer`] wires the steps
//! together; the individual pieces live in their own submodules.

pub mod analyzer;
pub mod lemmatizer;
pub mod token;
pub mod tokenizer;
