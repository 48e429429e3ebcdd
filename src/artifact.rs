//! Artifact persistence for compiled domains.
//!
//! Each compiled corpus owns exactly three durable artifacts — vocabulary,
//! topic-label list, classifier model — keyed by domain name. The
//! [`ArtifactStore`] trait abstracts where they live: [`file::FileArtifactStore`]
//! writes them under a models directory with atomic replace semantics, and
//! [`memory::MemoryArtifactStore`] keeps them in memory for tests.
//!
//! Stores never expose partial state: `save` lands all three artifacts or
//! none, and `load` fails if any of the three is missing.

pub mod file;
pub mod memory;

use std::fmt;

use crate::compiler::vocabulary::{TopicLabels, Vocabulary};
use crate::error::Result;
use crate::nn::network::ClassifierModel;

/// The three artifacts a compiled domain persists.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainArtifacts {
    /// Sorted lemma vocabulary (feature-vector layout).
    pub vocabulary: Vocabulary,
    /// Sorted topic-label list (output-layer layout).
    pub labels: TopicLabels,
    /// Trained classifier with metadata.
    pub model: ClassifierModel,
}

/// A storage backend for compiled-domain artifacts.
pub trait ArtifactStore: Send + Sync + fmt::Debug {
    /// Persist all three artifacts for a domain, overwriting any previous
    /// compile wholesale. Must not leave partial state on failure.
    fn save(&self, domain: &str, artifacts: &DomainArtifacts) -> Result<()>;

    /// Load the artifacts for a domain.
    ///
    /// Fails with a configuration error if the domain was never compiled
    /// (or any of its three artifacts is missing).
    fn load(&self, domain: &str) -> Result<DomainArtifacts>;

    /// Whether the domain has a complete artifact set.
    fn exists(&self, domain: &str) -> bool;

    /// Remove a domain's artifacts. Removing an unknown domain is a no-op.
    fn delete(&self, domain: &str) -> Result<()>;

    /// List domains with complete artifact sets, sorted by name.
    fn list_domains(&self) -> Result<Vec<String>>;
}
