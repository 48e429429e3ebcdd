//! Corpus compiler: from labeled corpus to persisted classifier artifacts.
//!
//! Compilation runs offline, ahead of any inference traffic. For one corpus
//! it extracts a document per pattern phrase, builds the sorted vocabulary
//! and topic-label list, encodes the bag-of-words training set, shuffles it
//! once, trains the feed-forward classifier, and only then persists the
//! three artifacts — a failed compile never leaves partial state behind.
//!
//! # Examples
//!
//! ```
//! use parley::artifact::memory::MemoryArtifactStore;
//! use parley::compiler::CorpusCompiler;
//! use parley::config::PipelineConfig;
//! use parley::corpus::{Corpus, Intent};
//!
//! let corpus = Corpus::new(
//!     "general",
//!     vec![Intent {
//!         tag: "greeting".to_string(),
//!         patterns: vec!["hello".to_string(), "hi there".to_string()],
//!         responses: vec!["Hi!".to_string()],
//!     }],
//! );
//!
//! let config = PipelineConfig::default().with_seed(42);
//! let compiler = CorpusCompiler::new(config);
//! let store = MemoryArtifactStore::new();
//! let compiled = compiler.compile_and_persist(&corpus, &store).unwrap();
//! assert_eq!(compiled.labels.tags(), &["greeting"]);
//! ```

pub mod training;
pub mod vocabulary;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::analysis::analyzer::MessageAnalyzer;
use crate::artifact::{ArtifactStore, DomainArtifacts};
use crate::compiler::training::{Document, encode_training_set};
use crate::compiler::vocabulary::{TopicLabels, Vocabulary};
use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::error::{ParleyError, Result};
use crate::nn::network::{ClassifierModel, ModelMetadata, Network};
use crate::nn::trainer::{Trainer, TrainingStats};

/// Everything one compile produces for a domain.
#[derive(Debug, Clone)]
pub struct CompiledDomain {
    /// Domain (corpus) name the artifacts are keyed by.
    pub domain: String,
    /// Sorted lemma vocabulary.
    pub vocabulary: Vocabulary,
    /// Sorted topic-label list.
    pub labels: TopicLabels,
    /// Trained classifier.
    pub model: ClassifierModel,
    /// Loss curve and timing of the training run.
    pub stats: TrainingStats,
}

impl CompiledDomain {
    /// The persistable artifact bundle for this compile.
    pub fn artifacts(&self) -> DomainArtifacts {
        DomainArtifacts {
            vocabulary: self.vocabulary.clone(),
            labels: self.labels.clone(),
            model: self.model.clone(),
        }
    }
}

/// Transforms corpora into trained, persisted classifier artifacts.
#[derive(Debug)]
pub struct CorpusCompiler {
    analyzer: MessageAnalyzer,
    config: PipelineConfig,
}

impl CorpusCompiler {
    /// Create a compiler for the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        let analyzer = MessageAnalyzer::with_ignore_tokens(config.ignore_tokens.clone());
        CorpusCompiler { analyzer, config }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Compile one corpus without persisting.
    ///
    /// Fails with [`ParleyError::EmptyCorpus`] if the corpus declares no
    /// intents, has no pattern phrases, or yields no usable tokens. A corpus
    /// with a single topic tag trains to a trivial always-that-topic
    /// classifier rather than failing.
    pub fn compile(&self, corpus: &Corpus) -> Result<CompiledDomain> {
        if corpus.is_empty() {
            return Err(ParleyError::empty_corpus(format!(
                "corpus '{}' declares no intents",
                corpus.name()
            )));
        }

        // One document per pattern phrase; intents without patterns
        // contribute neither documents nor labels.
        let mut documents = Vec::new();
        for intent in corpus.intents() {
            for pattern in &intent.patterns {
                let lemmas = self.analyzer.analyze(pattern)?;
                documents.push(Document::new(lemmas, intent.tag.clone()));
            }
        }
        if documents.is_empty() {
            return Err(ParleyError::empty_corpus(format!(
                "corpus '{}' has no pattern phrases",
                corpus.name()
            )));
        }

        let vocabulary =
            Vocabulary::from_terms(documents.iter().flat_map(|d| d.lemmas.iter().cloned()));
        if vocabulary.is_empty() {
            return Err(ParleyError::empty_corpus(format!(
                "corpus '{}' has no usable pattern tokens",
                corpus.name()
            )));
        }
        let labels = TopicLabels::from_tags(documents.iter().map(|d| d.tag.clone()));

        let mut examples = encode_training_set(&documents, &vocabulary, &labels)?;
        let mut rng = self.rng();
        // Shuffled once before fitting, not per epoch.
        examples.shuffle(&mut rng);

        log::info!(
            "compiling domain '{}': {} documents, {} vocabulary terms, {} topics",
            corpus.name(),
            documents.len(),
            vocabulary.len(),
            labels.len()
        );

        let mut network = Network::new(
            vocabulary.len(),
            self.config.training.hidden_units_1,
            self.config.training.hidden_units_2,
            labels.len(),
            self.config.training.dropout,
            &mut rng,
        );
        let trainer = Trainer::new(self.config.training.clone());
        let stats = trainer.fit(&mut network, &examples, &mut rng)?;

        log::info!(
            "domain '{}' trained in {} ms, final loss {:.6}",
            corpus.name(),
            stats.training_time_ms,
            stats.final_loss
        );

        let metadata = ModelMetadata::new(examples.len(), stats.final_loss, &self.config.training);
        Ok(CompiledDomain {
            domain: corpus.name().to_string(),
            vocabulary,
            labels,
            model: ClassifierModel { network, metadata },
            stats,
        })
    }

    /// Compile one corpus and persist its artifacts, overwriting any
    /// previous compile of the same domain.
    pub fn compile_and_persist(
        &self,
        corpus: &Corpus,
        store: &dyn ArtifactStore,
    ) -> Result<CompiledDomain> {
        let compiled = self.compile(corpus)?;
        store.save(&compiled.domain, &compiled.artifacts())?;
        Ok(compiled)
    }

    /// Compile every `*.json` corpus in the configured corpora directory.
    ///
    /// Idempotent per domain: recompiling overwrites prior artifacts.
    /// Returns the compiled domain names.
    pub fn compile_all(&self, store: &dyn ArtifactStore) -> Result<Vec<String>> {
        let corpora = Corpus::load_dir(&self.config.corpora_dir)?;
        let mut domains = Vec::with_capacity(corpora.len());
        for corpus in &corpora {
            self.compile_and_persist(corpus, store)?;
            domains.push(corpus.name().to_string());
        }
        Ok(domains)
    }
}
