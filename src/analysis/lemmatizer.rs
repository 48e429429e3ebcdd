//! Lemmatization for reducing words to their dictionary base forms.
//!
//! The compiler and the engine both compare *lemmas*, never surface forms,
//! so the lemmatizer only has to be consistent with itself: the same rules
//! run over corpus patterns and over incoming messages.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Trait for lemmatization algorithms.
pub trait Lemmatizer: Send + Sync {
    /// Reduce a word to its base form. The input is expected to already be
    /// lowercased.
    fn lemmatize(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

lazy_static! {
    /// Irregular noun plurals that suffix rules cannot reach.
    static ref IRREGULAR_NOUNS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("men", "man");
        m.insert("women", "woman");
        m.insert("children", "child");
        m.insert("people", "person");
        m.insert("feet", "foot");
        m.insert("teeth", "tooth");
        m.insert("geese", "goose");
        m.insert("mice", "mouse");
        m.insert("lives", "life");
        m.insert("wives", "wife");
        m.insert("knives", "knife");
        m.insert("leaves", "leaf");
        m
    };
}

/// Rule-based English noun lemmatizer.
///
/// Resolves irregular plurals through a fixed table, then applies ordered
/// suffix rules (`sses` → `ss`, `ies` → `y`, `xes`/`zes`/`ches`/`shes` →
/// strip `es`, trailing `s` → strip). Words ending in `ss`, `us`, or `is`
/// are left alone, as are words too short for a suffix to be meaningful.
/// Verb inflections are not reduced; like the pipeline it normalizes for,
/// this lemmatizer treats words as nouns.
///
/// # Examples
///
/// ```
/// use parley::analysis::lemmatizer::{EnglishLemmatizer, Lemmatizer};
///
/// let lemmatizer = EnglishLemmatizer::new();
/// assert_eq!(lemmatizer.lemmatize("dogs"), "dog");
/// assert_eq!(lemmatizer.lemmatize("classes"), "class");
/// assert_eq!(lemmatizer.lemmatize("children"), "child");
/// assert_eq!(lemmatizer.lemmatize("class"), "class");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnglishLemmatizer;

impl EnglishLemmatizer {
    /// Create a new English lemmatizer.
    pub fn new() -> Self {
        EnglishLemmatizer
    }

    fn ends_with(word: &str, suffix: &str) -> bool {
        word.len() > suffix.len() && word.ends_with(suffix)
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = IRREGULAR_NOUNS.get(word) {
            return base.to_string();
        }

        // Non-plural endings that merely look plural.
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }

        if Self::ends_with(word, "sses") {
            return word[..word.len() - 2].to_string();
        }
        if Self::ends_with(word, "ies") && word.len() > 4 {
            return format!("{}y", &word[..word.len() - 3]);
        }
        if Self::ends_with(word, "xes")
            || Self::ends_with(word, "zes")
            || Self::ends_with(word, "ches")
            || Self::ends_with(word, "shes")
        {
            return word[..word.len() - 2].to_string();
        }
        if Self::ends_with(word, "s") && word.len() > 3 {
            return word[..word.len() - 1].to_string();
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "english"
    }
}
