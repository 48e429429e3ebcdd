//! File-based artifact storage.
//!
//! Artifacts live in one directory, three files per domain:
//! `<domain>_words.json`, `<domain>_classes.json`, `<domain>_model.bin`.
//! The vocabulary and label list are JSON (ordered string lists, exactly as
//! the external contract describes); the model is bincode. Saves stage each
//! file under a temporary name and rename into place only after all three
//! are written, so a crashed or failed compile never leaves a mixed
//! artifact set visible to inference.

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{ArtifactStore, DomainArtifacts};
use crate::compiler::vocabulary::{TopicLabels, Vocabulary};
use crate::error::{ParleyError, Result};
use crate::nn::network::ClassifierModel;

const WORDS_SUFFIX: &str = "_words.json";
const CLASSES_SUFFIX: &str = "_classes.json";
const MODEL_SUFFIX: &str = "_model.bin";

/// Artifact storage rooted at a models directory.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    directory: PathBuf,
}

impl FileArtifactStore {
    /// Create a store rooted at `directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.exists() {
            fs::create_dir_all(&directory)?;
        }
        if !directory.is_dir() {
            return Err(ParleyError::configuration(format!(
                "models path is not a directory: {}",
                directory.display()
            )));
        }
        Ok(FileArtifactStore { directory })
    }

    /// The directory artifacts are stored in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, domain: &str, suffix: &str) -> PathBuf {
        self.directory.join(format!("{domain}{suffix}"))
    }

    fn missing(&self, domain: &str, suffix: &str) -> ParleyError {
        ParleyError::configuration(format!(
            "domain '{domain}' has no compiled artifacts (missing {})",
            self.path_for(domain, suffix).display()
        ))
    }

    fn stage(&self, path: &Path, bytes: &[u8]) -> Result<PathBuf> {
        let staged = path.with_extension("tmp");
        fs::write(&staged, bytes)?;
        Ok(staged)
    }
}

impl ArtifactStore for FileArtifactStore {
    fn save(&self, domain: &str, artifacts: &DomainArtifacts) -> Result<()> {
        let words_json = serde_json::to_vec_pretty(&artifacts.vocabulary)?;
        let classes_json = serde_json::to_vec_pretty(&artifacts.labels)?;
        let model_bin = bincode::serialize(&artifacts.model)
            .map_err(|e| ParleyError::serialization(format!("model encode failed: {e}")))?;

        // Stage everything before renaming anything.
        let words_path = self.path_for(domain, WORDS_SUFFIX);
        let classes_path = self.path_for(domain, CLASSES_SUFFIX);
        let model_path = self.path_for(domain, MODEL_SUFFIX);
        let staged = [
            (self.stage(&words_path, &words_json)?, words_path),
            (self.stage(&classes_path, &classes_json)?, classes_path),
            (self.stage(&model_path, &model_bin)?, model_path),
        ];
        for (from, to) in &staged {
            fs::rename(from, to)?;
        }
        Ok(())
    }

    fn load(&self, domain: &str) -> Result<DomainArtifacts> {
        for suffix in [WORDS_SUFFIX, CLASSES_SUFFIX, MODEL_SUFFIX] {
            if !self.path_for(domain, suffix).exists() {
                return Err(self.missing(domain, suffix));
            }
        }

        let words_json = fs::read_to_string(self.path_for(domain, WORDS_SUFFIX))?;
        let vocabulary: Vocabulary = serde_json::from_str(&words_json)?;

        let classes_json = fs::read_to_string(self.path_for(domain, CLASSES_SUFFIX))?;
        let labels: TopicLabels = serde_json::from_str(&classes_json)?;

        let model_bin = fs::read(self.path_for(domain, MODEL_SUFFIX))?;
        let model: ClassifierModel = bincode::deserialize(&model_bin).map_err(|e| {
            ParleyError::serialization(format!("model decode failed for '{domain}': {e}"))
        })?;

        Ok(DomainArtifacts {
            vocabulary,
            labels,
            model,
        })
    }

    fn exists(&self, domain: &str) -> bool {
        [WORDS_SUFFIX, CLASSES_SUFFIX, MODEL_SUFFIX]
            .iter()
            .all(|suffix| self.path_for(domain, suffix).exists())
    }

    fn delete(&self, domain: &str) -> Result<()> {
        for suffix in [WORDS_SUFFIX, CLASSES_SUFFIX, MODEL_SUFFIX] {
            let path = self.path_for(domain, suffix);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn list_domains(&self) -> Result<Vec<String>> {
        let mut domains = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if let Some(domain) = name.strip_suffix(WORDS_SUFFIX) {
                if self.exists(domain) {
                    domains.push(domain.to_string());
                }
            }
        }
        domains.sort();
        Ok(domains)
    }
}
