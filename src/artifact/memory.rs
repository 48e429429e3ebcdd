//! In-memory artifact storage for tests and ephemeral pipelines.

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::artifact::{ArtifactStore, DomainArtifacts};
use crate::error::{ParleyError, Result};

/// An artifact store backed by a map. Saves are atomic by construction.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    domains: RwLock<AHashMap<String, DomainArtifacts>>,
}

impl MemoryArtifactStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of domains stored.
    pub fn domain_count(&self) -> usize {
        self.domains.read().len()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn save(&self, domain: &str, artifacts: &DomainArtifacts) -> Result<()> {
        self.domains
            .write()
            .insert(domain.to_string(), artifacts.clone());
        Ok(())
    }

    fn load(&self, domain: &str) -> Result<DomainArtifacts> {
        self.domains.read().get(domain).cloned().ok_or_else(|| {
            ParleyError::configuration(format!("domain '{domain}' has no compiled artifacts"))
        })
    }

    fn exists(&self, domain: &str) -> bool {
        self.domains.read().contains_key(domain)
    }

    fn delete(&self, domain: &str) -> Result<()> {
        self.domains.write().remove(domain);
        Ok(())
    }

    fn list_domains(&self) -> Result<Vec<String>> {
        let mut domains: Vec<String> = self.domains.read().keys().cloned().collect();
        domains.sort();
        Ok(domains)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::compiler::vocabulary::{TopicLabels, Vocabulary};
    use crate::config::TrainingConfig;
    use crate::nn::network::{ClassifierModel, ModelMetadata, Network};

    fn sample_artifacts() -> DomainArtifacts {
        let mut rng = StdRng::seed_from_u64(7);
        DomainArtifacts {
            vocabulary: Vocabulary::from_terms(["hello"]),
            labels: TopicLabels::from_tags(["greeting"]),
            model: ClassifierModel {
                network: Network::new(1, 4, 4, 1, 0.2, &mut rng),
                metadata: ModelMetadata::new(1, 0.0, &TrainingConfig::default()),
            },
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryArtifactStore::new();
        assert!(!store.exists("general"));

        let artifacts = sample_artifacts();
        store.save("general", &artifacts).unwrap();
        assert!(store.exists("general"));
        assert_eq!(store.load("general").unwrap(), artifacts);
        assert_eq!(store.list_domains().unwrap(), vec!["general"]);

        store.delete("general").unwrap();
        assert_eq!(store.domain_count(), 0);
        assert!(store.load("general").is_err());
    }
}
