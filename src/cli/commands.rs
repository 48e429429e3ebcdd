//! CLI command execution.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::artifact::ArtifactStore;
use crate::artifact::file::FileArtifactStore;
use crate::cli::args::{AskArgs, ChatArgs, Command, CompileArgs, ParleyArgs};
use crate::compiler::CorpusCompiler;
use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::engine::InferenceEngine;
use crate::error::{ParleyError, Result};

/// Execute the parsed command.
pub fn execute_command(args: ParleyArgs) -> Result<()> {
    let mut config = PipelineConfig::new(&args.corpora_dir, &args.models_dir);
    config.seed = args.seed;

    match &args.command {
        Command::Compile(compile_args) => execute_compile(&config, compile_args),
        Command::Ask(ask_args) => execute_ask(&config, ask_args),
        Command::Chat(chat_args) => execute_chat(&config, chat_args),
        Command::List(_) => execute_list(&config),
    }
}

fn store(config: &PipelineConfig) -> Result<FileArtifactStore> {
    FileArtifactStore::new(&config.models_dir)
}

fn execute_compile(config: &PipelineConfig, args: &CompileArgs) -> Result<()> {
    let store = store(config)?;
    let compiler = CorpusCompiler::new(config.clone());

    match &args.domain {
        Some(domain) => {
            let path = config.corpora_dir.join(format!("{domain}.json"));
            if !path.exists() {
                return Err(ParleyError::configuration(format!(
                    "no corpus file for domain '{domain}' at {}",
                    path.display()
                )));
            }
            let corpus = Corpus::load(&path)?;
            let compiled = compiler.compile_and_persist(&corpus, &store)?;
            println!(
                "compiled '{}': {} terms, {} topics, final loss {:.6}",
                compiled.domain,
                compiled.vocabulary.len(),
                compiled.labels.len(),
                compiled.stats.final_loss
            );
        }
        None => {
            let domains = compiler.compile_all(&store)?;
            if domains.is_empty() {
                println!(
                    "no corpora found in {}",
                    config.corpora_dir.display()
                );
            }
            for domain in domains {
                println!("compiled '{domain}'");
            }
        }
    }
    Ok(())
}

fn execute_ask(config: &PipelineConfig, args: &AskArgs) -> Result<()> {
    let mut config = config.clone();
    if let Some(threshold) = args.threshold {
        config.confidence_threshold = threshold;
    }
    let store = Arc::new(store(&config)?);
    let engine = InferenceEngine::new(&config, store);
    let response = engine.infer(&args.domain, &args.message)?;
    println!("{response}");
    Ok(())
}

fn execute_chat(config: &PipelineConfig, args: &ChatArgs) -> Result<()> {
    let store = Arc::new(store(config)?);
    let engine = InferenceEngine::new(config, store);

    // Load the live corpus once for the session.
    let corpus_path = config.corpora_dir.join(format!("{}.json", args.domain));
    if !corpus_path.exists() {
        return Err(ParleyError::configuration(format!(
            "no corpus file for domain '{}' at {}",
            args.domain,
            corpus_path.display()
        )));
    }
    let corpus = Corpus::load(&corpus_path)?;

    println!("chatting against '{}' (blank line or 'quit' to exit)", args.domain);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() || message == "quit" || message == "exit" {
            break;
        }

        let response = engine.respond(&args.domain, message, &corpus)?;
        println!("{response}");
    }
    Ok(())
}

fn execute_list(config: &PipelineConfig) -> Result<()> {
    let store = store(config)?;
    let domains = store.list_domains()?;
    if domains.is_empty() {
        println!("no compiled domains in {}", config.models_dir.display());
    }
    for domain in domains {
        println!("{domain}");
    }
    Ok(())
}
