//! Corpus data model and JSON loading.
//!
//! A corpus is a named collection of intents, each pairing a unique topic
//! tag with example pattern phrases and candidate response texts. Corpora
//! are authored externally as JSON files (one per domain) and are read-only
//! to both the compiler and the engine. The wire format is the crate's only
//! external file contract:
//!
//! ```json
//! {
//!   "intents": [
//!     {
//!       "tag": "greeting",
//!       "patterns": ["hello", "hi there"],
//!       "responses": ["Hi!", "Hello!"]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

/// A named topic with example phrases and candidate responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Unique topic tag.
    pub tag: String,
    /// Example user utterances for this topic.
    pub patterns: Vec<String>,
    /// Candidate replies for this topic.
    pub responses: Vec<String>,
}

/// On-disk corpus document: a list of intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CorpusDocument {
    intents: Vec<Intent>,
}

/// A named, read-only collection of intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    name: String,
    intents: Vec<Intent>,
}

impl Corpus {
    /// Create a corpus from intents already in memory.
    pub fn new<S: Into<String>>(name: S, intents: Vec<Intent>) -> Self {
        Corpus {
            name: name.into(),
            intents,
        }
    }

    /// Parse a corpus from its JSON document.
    pub fn from_json<S: Into<String>>(name: S, json: &str) -> Result<Self> {
        let name = name.into();
        let document: CorpusDocument = serde_json::from_str(json).map_err(|e| {
            ParleyError::corpus_format(format!("corpus '{name}' is not valid corpus JSON: {e}"))
        })?;
        Ok(Corpus {
            name,
            intents: document.intents,
        })
    }

    /// Load a corpus from a JSON file. The domain name is the file stem.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ParleyError::corpus_format(format!("invalid corpus path: {}", path.display()))
            })?
            .to_string();
        let json = fs::read_to_string(path)?;
        Self::from_json(name, &json)
    }

    /// Load every `*.json` corpus in a directory, sorted by domain name.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Corpus>> {
        let dir = dir.as_ref();
        let mut corpora = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                corpora.push(Self::load(&path)?);
            }
        }
        corpora.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(corpora)
    }

    /// Serialize the corpus back to its JSON document form.
    pub fn to_json(&self) -> Result<String> {
        let document = CorpusDocument {
            intents: self.intents.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// The domain name of this corpus.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All intents in declaration order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Look up an intent by its topic tag.
    pub fn intent(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.tag == tag)
    }

    /// Whether the corpus declares no intents at all.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "intents": [
                {
                    "tag": "greeting",
                    "patterns": ["hello", "hi there"],
                    "responses": ["Hi!", "Hello!"]
                },
                {
                    "tag": "farewell",
                    "patterns": ["bye", "see you later"],
                    "responses": ["Goodbye!"]
                }
            ]
        }"#
    }

    #[test]
    fn test_from_json() {
        let corpus = Corpus::from_json("general", sample_json()).unwrap();
        assert_eq!(corpus.name(), "general");
        assert_eq!(corpus.intents().len(), 2);
        assert_eq!(corpus.intents()[0].tag, "greeting");
    }

    #[test]
    fn test_intent_lookup() {
        let corpus = Corpus::from_json("general", sample_json()).unwrap();
        let intent = corpus.intent("farewell").unwrap();
        assert_eq!(intent.responses, vec!["Goodbye!"]);
        assert!(corpus.intent("missing").is_none());
    }

    #[test]
    fn test_round_trip() {
        let corpus = Corpus::from_json("general", sample_json()).unwrap();
        let json = corpus.to_json().unwrap();
        let reparsed = Corpus::from_json("general", &json).unwrap();
        assert_eq!(corpus, reparsed);
    }

    #[test]
    fn test_malformed_json_is_corpus_format_error() {
        let err = Corpus::from_json("bad", "{\"intents\": 42}").unwrap_err();
        assert!(matches!(err, crate::error::ParleyError::CorpusFormat(_)));
    }
}
