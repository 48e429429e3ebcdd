//! Vocabulary and topic-label artifacts.
//!
//! Both are alphabetically ordered, deduplicated string lists whose index
//! positions are load-bearing: a vocabulary index is a feature-vector slot
//! and a label index is a classifier output slot. Sorting makes compilation
//! deterministic — the same corpus always produces byte-identical artifacts.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The ordered set of unique lemmas drawn from a corpus's pattern phrases.
///
/// # Examples
///
/// ```
/// use parley::compiler::vocabulary::Vocabulary;
///
/// let vocabulary = Vocabulary::from_terms(["hello", "hi", "there", "hello"]);
/// assert_eq!(vocabulary.len(), 3);
/// assert_eq!(vocabulary.index_of("hi"), Some(1));
///
/// let features = vocabulary.encode(&["hi".to_string(), "unknown".to_string()]);
/// assert_eq!(features, vec![0.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from raw lemmas: deduplicate and sort.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = terms.into_iter().map(|s| s.into()).collect();
        let terms: Vec<String> = unique.into_iter().collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Vocabulary { terms, index }
    }

    /// Number of entries (the feature-vector width).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The ordered terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Feature-vector slot of a lemma, if present.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Encode a lemma sequence as a binary bag-of-words feature vector.
    ///
    /// Slot `i` is 1.0 iff some lemma equals term `i` (lemma equality, never
    /// substring containment). Lemmas absent from the vocabulary contribute
    /// nothing. The result always has exactly `len()` slots.
    pub fn encode(&self, lemmas: &[String]) -> Vec<f64> {
        let mut features = vec![0.0; self.terms.len()];
        for lemma in lemmas {
            if let Some(slot) = self.index_of(lemma) {
                features[slot] = 1.0;
            }
        }
        features
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        Vocabulary::from_terms(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// The ordered set of unique topic tags in a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TopicLabels {
    tags: Vec<String>,
}

impl TopicLabels {
    /// Build the label list from raw tags: deduplicate and sort.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = tags.into_iter().map(|s| s.into()).collect();
        TopicLabels {
            tags: unique.into_iter().collect(),
        }
    }

    /// Number of labels (the classifier output width).
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether there are no labels.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The ordered tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Output slot of a tag, if present.
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    /// Tag at an output slot, if in range.
    pub fn tag_at(&self, index: usize) -> Option<&str> {
        self.tags.get(index).map(|s| s.as_str())
    }

    /// One-hot label vector for a tag, if present.
    pub fn one_hot(&self, tag: &str) -> Option<Vec<f64>> {
        let slot = self.index_of(tag)?;
        let mut label = vec![0.0; self.tags.len()];
        label[slot] = 1.0;
        Some(label)
    }
}

impl From<Vec<String>> for TopicLabels {
    fn from(tags: Vec<String>) -> Self {
        TopicLabels::from_tags(tags)
    }
}

impl From<TopicLabels> for Vec<String> {
    fn from(labels: TopicLabels) -> Self {
        labels.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_sorted_and_unique() {
        let vocabulary = Vocabulary::from_terms(["zebra", "apple", "mango", "apple"]);
        assert_eq!(vocabulary.terms(), &["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_deterministic_construction() {
        let a = Vocabulary::from_terms(["b", "a", "c"]);
        let b = Vocabulary::from_terms(["c", "b", "a", "a"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_length_invariant() {
        let vocabulary = Vocabulary::from_terms(["hello", "there"]);
        for lemmas in [
            vec![],
            vec!["hello".to_string()],
            vec!["xyzzyplugh".to_string(); 40],
        ] {
            assert_eq!(vocabulary.encode(&lemmas).len(), vocabulary.len());
        }
    }

    #[test]
    fn test_encode_requires_exact_match() {
        let vocabulary = Vocabulary::from_terms(["hello"]);
        // "hell" is a substring, not a lemma match.
        let features = vocabulary.encode(&["hell".to_string()]);
        assert_eq!(features, vec![0.0]);
    }

    #[test]
    fn test_vocabulary_serde_round_trip() {
        let vocabulary = Vocabulary::from_terms(["hi", "there"]);
        let json = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(json, r#"["hi","there"]"#);
        let restored: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(vocabulary, restored);
        assert_eq!(restored.index_of("there"), Some(1));
    }

    #[test]
    fn test_topic_labels() {
        let labels = TopicLabels::from_tags(["kpop", "anime", "kpop"]);
        assert_eq!(labels.tags(), &["anime", "kpop"]);
        assert_eq!(labels.index_of("kpop"), Some(1));
        assert_eq!(labels.tag_at(0), Some("anime"));
        assert_eq!(labels.one_hot("anime"), Some(vec![1.0, 0.0]));
        assert_eq!(labels.one_hot("jazz"), None);
    }
}
