//! End-to-end tests for the compile-then-infer pipeline.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use parley::artifact::ArtifactStore;
use parley::artifact::file::FileArtifactStore;
use parley::artifact::memory::MemoryArtifactStore;
use parley::compiler::CorpusCompiler;
use parley::config::PipelineConfig;
use parley::corpus::{Corpus, Intent};
use parley::engine::InferenceEngine;
use parley::error::ParleyError;
use tempfile::TempDir;

fn intent(tag: &str, patterns: &[&str], responses: &[&str]) -> Intent {
    Intent {
        tag: tag.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        responses: responses.iter().map(|r| r.to_string()).collect(),
    }
}

fn general_corpus() -> Corpus {
    Corpus::new(
        "general",
        vec![intent(
            "general",
            &["hello", "hi there"],
            &["Hi!", "Hello!"],
        )],
    )
}

fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::default().with_seed(42);
    // Small hidden layers keep the end-to-end runs quick.
    config.training.hidden_units_1 = 16;
    config.training.hidden_units_2 = 8;
    config
}

fn compiled_engine(corpus: &Corpus, config: &PipelineConfig) -> InferenceEngine {
    let store = Arc::new(MemoryArtifactStore::new());
    CorpusCompiler::new(config.clone())
        .compile_and_persist(corpus, store.as_ref())
        .unwrap();
    InferenceEngine::new(config, store)
}

#[test]
fn hello_classifies_to_general_and_answers_from_its_pool() {
    let corpus = general_corpus();
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    let prediction = engine.predict("general", "hello").unwrap();
    assert_eq!(prediction.tag(), Some("general"));

    let response = engine.respond("general", "hello", &corpus).unwrap();
    assert!(["Hi!", "Hello!"].contains(&response.as_str()));
}

#[test]
fn unseen_word_takes_the_fallback_path() {
    let corpus = general_corpus();
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    let prediction = engine.predict("general", "xyzzyplugh").unwrap();
    assert!(!prediction.is_matched());

    let response = engine.respond("general", "xyzzyplugh", &corpus).unwrap();
    assert!(config.fallback_responses.contains(&response));
}

#[test]
fn empty_message_takes_the_fallback_path() {
    let corpus = general_corpus();
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    for message in ["", "   ", "?!..."] {
        let response = engine.respond("general", message, &corpus).unwrap();
        assert!(config.fallback_responses.contains(&response));
    }
}

#[test]
fn disjoint_topics_never_cross_classify() {
    let corpus = Corpus::new(
        "fandom",
        vec![
            intent(
                "anime",
                &["favorite anime series", "watch shounen episodes", "manga adaptation"],
                &["Big anime fan!"],
            ),
            intent(
                "kpop",
                &["kpop idol group", "comeback stage single", "lightstick concert"],
                &["Stan loudly!"],
            ),
        ],
    );
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    let prediction = engine.predict("fandom", "anime episodes manga").unwrap();
    assert_eq!(prediction.tag(), Some("anime"));

    let prediction = engine.predict("fandom", "kpop comeback lightstick").unwrap();
    assert_eq!(prediction.tag(), Some("kpop"));
}

#[test]
fn response_pool_has_no_dead_entries() {
    let corpus = Corpus::new(
        "general",
        vec![intent(
            "general",
            &["hello", "hi there"],
            &["One.", "Two.", "Three."],
        )],
    );
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    let mut seen = HashSet::new();
    for _ in 0..200 {
        seen.insert(engine.respond("general", "hello", &corpus).unwrap());
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn respond_many_returns_requested_number_of_draws() {
    let corpus = general_corpus();
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    let responses = engine.respond_many("general", "hello", &corpus, 3).unwrap();
    assert_eq!(responses.len(), 3);
    for response in responses {
        assert!(["Hi!", "Hello!"].contains(&response.as_str()));
    }
}

#[test]
fn encoded_width_always_matches_vocabulary() {
    let corpus = general_corpus();
    let config = test_config();
    let compiled = CorpusCompiler::new(config.clone()).compile(&corpus).unwrap();
    let engine = compiled_engine(&corpus, &config);

    for message in ["", "hello", "hello hello hello", "xyzzyplugh and more words"] {
        let features = engine.encode(message, &compiled.vocabulary).unwrap();
        assert_eq!(features.len(), compiled.vocabulary.len());
    }
}

#[test]
fn unknown_domain_is_a_hard_error() {
    let config = test_config();
    let store = Arc::new(MemoryArtifactStore::new());
    let engine = InferenceEngine::new(&config, store);

    let err = engine.predict("ghost", "hello").unwrap_err();
    assert!(matches!(err, ParleyError::Configuration(_)));
}

#[test]
fn stale_corpus_falls_back_instead_of_crashing() {
    let corpus = general_corpus();
    let config = test_config();
    let engine = compiled_engine(&corpus, &config);

    // Simulate the corpus being edited after compilation: the predicted tag
    // no longer exists in the live corpus handed to respond().
    let edited = Corpus::new(
        "general",
        vec![intent("renamed", &["hello"], &["Hey!"])],
    );
    let response = engine.respond("general", "hello", &edited).unwrap();
    assert!(config.fallback_responses.contains(&response));
}

#[test]
fn recompiling_twice_yields_identical_vocabulary_and_labels() {
    let corpus = Corpus::new(
        "fandom",
        vec![
            intent("anime", &["watch anime shows", "manga series"], &["ok"]),
            intent("kpop", &["kpop idols", "comeback stage"], &["ok"]),
        ],
    );
    let compiler = CorpusCompiler::new(test_config());
    let a = compiler.compile(&corpus).unwrap();
    let b = compiler.compile(&corpus).unwrap();

    assert_eq!(a.vocabulary, b.vocabulary);
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.model.network, b.model.network);
}

#[test]
fn compile_all_and_infer_against_files_on_disk() {
    let workspace = TempDir::new().unwrap();
    let corpora_dir = workspace.path().join("corpora");
    let models_dir = workspace.path().join("models");
    fs::create_dir_all(&corpora_dir).unwrap();

    let corpus = general_corpus();
    fs::write(
        corpora_dir.join("general.json"),
        corpus.to_json().unwrap(),
    )
    .unwrap();

    let mut config = test_config();
    config.corpora_dir = corpora_dir;
    config.models_dir = models_dir.clone();

    let store = FileArtifactStore::new(&models_dir).unwrap();
    let domains = CorpusCompiler::new(config.clone()).compile_all(&store).unwrap();
    assert_eq!(domains, vec!["general"]);
    assert!(store.exists("general"));

    let engine = InferenceEngine::new(&config, Arc::new(store));
    let response = engine.infer("general", "hi there").unwrap();
    assert!(["Hi!", "Hello!"].contains(&response.as_str()));

    // A domain with no corpus file is a configuration error.
    let err = engine.infer("ghost", "hello").unwrap_err();
    assert!(matches!(err, ParleyError::Configuration(_)));
}

#[test]
fn cache_invalidation_picks_up_recompiles() {
    let corpus = general_corpus();
    let config = test_config();
    let store = Arc::new(MemoryArtifactStore::new());
    let compiler = CorpusCompiler::new(config.clone());
    compiler
        .compile_and_persist(&corpus, store.as_ref())
        .unwrap();

    let engine = InferenceEngine::new(&config, store.clone() as Arc<dyn ArtifactStore>);
    assert!(engine.predict("general", "hello").unwrap().is_matched());

    // Recompile with an extra topic, then invalidate the cached domain.
    let widened = Corpus::new(
        "general",
        vec![
            intent("general", &["hello", "hi there"], &["Hi!"]),
            intent("weather", &["is it raining today", "weather forecast"], &["Grey."]),
        ],
    );
    compiler
        .compile_and_persist(&widened, store.as_ref())
        .unwrap();
    engine.invalidate("general");

    let prediction = engine.predict("general", "weather forecast today").unwrap();
    assert_eq!(prediction.tag(), Some("weather"));
}
