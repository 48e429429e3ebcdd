//! Inference engine: message in, response out.
//!
//! Each call is stateless given the compiled artifacts: tokenize →
//! vectorize → score → threshold-filter → select → retrieve. The engine
//! holds no conversational state; the only mutable pieces are the
//! per-domain artifact cache (loaded artifacts are immutable, so concurrent
//! readers never race) and the injected response-selection RNG.
//!
//! Soft outcomes never crash the caller. A message with no confident topic,
//! an empty message, or a predicted tag that has vanished from the live
//! corpus all resolve to the configured fallback response.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use parley::artifact::memory::MemoryArtifactStore;
//! use parley::compiler::CorpusCompiler;
//! use parley::config::PipelineConfig;
//! use parley::corpus::{Corpus, Intent};
//! use parley::engine::InferenceEngine;
//!
//! let corpus = Corpus::new(
//!     "general",
//!     vec![Intent {
//!         tag: "greeting".to_string(),
//!         patterns: vec!["hello".to_string(), "hi there".to_string()],
//!         responses: vec!["Hi!".to_string(), "Hello!".to_string()],
//!     }],
//! );
//!
//! let config = PipelineConfig::default().with_seed(42);
//! let store = Arc::new(MemoryArtifactStore::new());
//! CorpusCompiler::new(config.clone())
//!     .compile_and_persist(&corpus, store.as_ref())
//!     .unwrap();
//!
//! let engine = InferenceEngine::new(&config, store);
//! let response = engine.respond("general", "hello", &corpus).unwrap();
//! assert!(["Hi!", "Hello!"].contains(&response.as_str()));
//! ```

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::analysis::analyzer::MessageAnalyzer;
use crate::artifact::{ArtifactStore, DomainArtifacts};
use crate::compiler::vocabulary::Vocabulary;
use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::error::{ParleyError, Result};

/// Response used if the configuration supplies no fallback pool.
const LAST_RESORT_FALLBACK: &str = "Sorry, I don't understand.";

/// The outcome of classifying one message.
///
/// Callers must handle both variants; there is no way to index into an
/// empty result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// A topic cleared the confidence threshold.
    Matched {
        /// The winning topic tag.
        tag: String,
        /// Its softmax probability.
        score: f64,
    },
    /// No topic cleared the threshold (or the message had no tokens).
    Unmatched,
}

impl Prediction {
    /// Whether a topic was matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, Prediction::Matched { .. })
    }

    /// The matched tag, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Prediction::Matched { tag, .. } => Some(tag),
            Prediction::Unmatched => None,
        }
    }
}

/// Retain topic indices whose probability strictly exceeds `threshold`,
/// sorted by descending score with ties broken by ascending topic index.
///
/// The tie-break keeps selection deterministic regardless of how the
/// distribution was produced.
pub fn filter_and_select(distribution: &[f64], threshold: f64) -> Vec<(usize, f64)> {
    let mut candidates: Vec<(usize, f64)> = distribution
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| *score > threshold)
        .collect();
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    candidates
}

/// Classifies messages against compiled domains and retrieves responses.
pub struct InferenceEngine {
    store: Arc<dyn ArtifactStore>,
    analyzer: MessageAnalyzer,
    corpora_dir: PathBuf,
    confidence_threshold: f64,
    fallback_responses: Vec<String>,
    cache: RwLock<AHashMap<String, Arc<DomainArtifacts>>>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("store", &self.store)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("cached_domains", &self.cache.read().len())
            .finish()
    }
}

impl InferenceEngine {
    /// Create an engine over a store of compiled artifacts.
    ///
    /// The analyzer is built from the same configuration the compiler used,
    /// so messages normalize exactly like the corpus patterns did.
    pub fn new(config: &PipelineConfig, store: Arc<dyn ArtifactStore>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        InferenceEngine {
            store,
            analyzer: MessageAnalyzer::with_ignore_tokens(config.ignore_tokens.clone()),
            corpora_dir: config.corpora_dir.clone(),
            confidence_threshold: config.confidence_threshold,
            fallback_responses: config.fallback_responses.clone(),
            cache: RwLock::new(AHashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Load a domain's artifacts, serving repeat calls from the cache.
    fn artifacts(&self, domain: &str) -> Result<Arc<DomainArtifacts>> {
        if let Some(artifacts) = self.cache.read().get(domain) {
            return Ok(Arc::clone(artifacts));
        }
        let artifacts = Arc::new(self.store.load(domain)?);
        self.cache
            .write()
            .insert(domain.to_string(), Arc::clone(&artifacts));
        Ok(artifacts)
    }

    /// Drop a domain's cached artifacts. Call after recompiling it.
    pub fn invalidate(&self, domain: &str) {
        self.cache.write().remove(domain);
    }

    /// Drop every cached domain.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Encode a message against a vocabulary.
    ///
    /// The result always has exactly `vocabulary.len()` slots; tokens absent
    /// from the vocabulary contribute no signal.
    pub fn encode(&self, message: &str, vocabulary: &Vocabulary) -> Result<Vec<f64>> {
        let lemmas = self.analyzer.analyze(message)?;
        Ok(vocabulary.encode(&lemmas))
    }

    /// Classify a message within a domain.
    ///
    /// Unknown domains are a hard error; everything else resolves to a
    /// [`Prediction`]. A message with no usable tokens, or whose tokens are
    /// all out-of-vocabulary, is `Unmatched` without touching the
    /// classifier.
    pub fn predict(&self, domain: &str, message: &str) -> Result<Prediction> {
        let artifacts = self.artifacts(domain)?;

        let lemmas = self.analyzer.analyze(message)?;
        if lemmas.is_empty() {
            return Ok(Prediction::Unmatched);
        }

        let features = artifacts.vocabulary.encode(&lemmas);
        if features.iter().all(|&slot| slot == 0.0) {
            // Every token is out-of-vocabulary: no evidence to classify on.
            return Ok(Prediction::Unmatched);
        }

        let distribution = artifacts.model.network.forward(&features)?;
        let candidates = filter_and_select(&distribution, self.confidence_threshold);

        match candidates.first() {
            Some(&(index, score)) => {
                let tag = artifacts.labels.tag_at(index).ok_or_else(|| {
                    ParleyError::model(format!(
                        "classifier output slot {index} has no topic label in domain '{domain}'"
                    ))
                })?;
                Ok(Prediction::Matched {
                    tag: tag.to_string(),
                    score,
                })
            }
            None => Ok(Prediction::Unmatched),
        }
    }

    /// Classify a message and draw one response from the live corpus.
    ///
    /// Falls back to the configured fallback pool when nothing matches, and
    /// also when the predicted tag no longer exists in the corpus (corpus
    /// edited after compilation without recompiling).
    pub fn respond(&self, domain: &str, message: &str, corpus: &Corpus) -> Result<String> {
        match self.predict(domain, message)? {
            Prediction::Matched { tag, score } => match corpus.intent(&tag) {
                Some(intent) if !intent.responses.is_empty() => {
                    log::debug!("domain '{domain}': matched '{tag}' at {score:.3}");
                    Ok(self.pick(&intent.responses))
                }
                _ => {
                    log::warn!(
                        "domain '{domain}': predicted tag '{tag}' has no intent in the live \
                         corpus; recompile the domain"
                    );
                    Ok(self.fallback())
                }
            },
            Prediction::Unmatched => Ok(self.fallback()),
        }
    }

    /// Like [`respond`](Self::respond), but draws `count` responses for
    /// multi-part answers. Each draw is independent and uniform.
    pub fn respond_many(
        &self,
        domain: &str,
        message: &str,
        corpus: &Corpus,
        count: usize,
    ) -> Result<Vec<String>> {
        (0..count)
            .map(|_| self.respond(domain, message, corpus))
            .collect()
    }

    /// Full inference call: load the live corpus for `domain` from the
    /// corpora directory and answer `message`.
    pub fn infer(&self, domain: &str, message: &str) -> Result<String> {
        let corpus_path = self.corpora_dir.join(format!("{domain}.json"));
        if !corpus_path.exists() {
            return Err(ParleyError::configuration(format!(
                "no corpus file for domain '{domain}' at {}",
                corpus_path.display()
            )));
        }
        let corpus = Corpus::load(&corpus_path)?;
        self.respond(domain, message, &corpus)
    }

    fn pick(&self, responses: &[String]) -> String {
        let mut rng = self.rng.lock();
        let index = rng.random_range(0..responses.len());
        responses[index].clone()
    }

    fn fallback(&self) -> String {
        if self.fallback_responses.is_empty() {
            return LAST_RESORT_FALLBACK.to_string();
        }
        self.pick(&self.fallback_responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_and_select_threshold_is_strict() {
        let candidates = filter_and_select(&[0.1, 0.5, 0.4], 0.1);
        assert_eq!(candidates, vec![(1, 0.5), (2, 0.4)]);
    }

    #[test]
    fn test_filter_and_select_empty_distribution() {
        assert!(filter_and_select(&[], 0.1).is_empty());
        assert!(filter_and_select(&[0.05, 0.05], 0.1).is_empty());
    }

    #[test]
    fn test_tie_break_by_ascending_index() {
        let candidates = filter_and_select(&[0.3, 0.4, 0.4], 0.1);
        assert_eq!(candidates, vec![(1, 0.4), (2, 0.4), (0, 0.3)]);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let distribution = [0.05, 0.15, 0.25, 0.55];
        let mut previous_len = usize::MAX;
        for threshold in [0.0, 0.1, 0.2, 0.5, 0.9] {
            let retained = filter_and_select(&distribution, threshold).len();
            assert!(retained <= previous_len);
            previous_len = retained;
        }
    }

    #[test]
    fn test_prediction_accessors() {
        let matched = Prediction::Matched {
            tag: "greeting".to_string(),
            score: 0.9,
        };
        assert!(matched.is_matched());
        assert_eq!(matched.tag(), Some("greeting"));

        assert!(!Prediction::Unmatched.is_matched());
        assert_eq!(Prediction::Unmatched.tag(), None);
    }
}
