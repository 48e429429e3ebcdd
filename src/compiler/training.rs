//! Documents and training-set encoding.

use serde::{Deserialize, Serialize};

use crate::compiler::vocabulary::{TopicLabels, Vocabulary};
use crate::error::{ParleyError, Result};
use crate::nn::TrainingExample;

/// A tokenized pattern phrase paired with its owning topic tag.
///
/// Documents exist only during compilation; they are consumed to build the
/// training set and never persisted. The lemmas are already normalized by
/// the shared analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Normalized lemma sequence of the pattern phrase.
    pub lemmas: Vec<String>,
    /// Topic tag of the intent that owns the phrase.
    pub tag: String,
}

impl Document {
    /// Create a new document.
    pub fn new<S: Into<String>>(lemmas: Vec<String>, tag: S) -> Self {
        Document {
            lemmas,
            tag: tag.into(),
        }
    }
}

/// Encode every document as a (bag-of-words, one-hot) training example.
///
/// The output preserves document order; the compiler shuffles afterwards.
pub fn encode_training_set(
    documents: &[Document],
    vocabulary: &Vocabulary,
    labels: &TopicLabels,
) -> Result<Vec<TrainingExample>> {
    documents
        .iter()
        .map(|document| {
            let features = vocabulary.encode(&document.lemmas);
            let label = labels.one_hot(&document.tag).ok_or_else(|| {
                ParleyError::model(format!(
                    "document tag '{}' is missing from the topic-label list",
                    document.tag
                ))
            })?;
            Ok(TrainingExample::new(features, label))
        })
        .collect()
}
