//! Builds the on-disk knowledge base from the source dataset.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde_json::Value;

use resq_backend::core::config::{AppPaths, ConfigService, RetrievalMode};
use resq_backend::core::http::{build_client, RetryPolicy};
use resq_backend::core::logging;
use resq_backend::embedding::OpenAiEmbeddingProvider;
use resq_backend::knowledge::indexer::{build_embedding_file, build_keyword_file};
use resq_backend::knowledge::write_json_file;

/// Turns dataset.json into a keyword index or an embedding store.
#[derive(Parser, Debug)]
#[command(name = "resq-indexer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source dataset with contacts, guidelines and first aid
    #[arg(long, default_value = "dataset.json")]
    dataset: PathBuf,

    /// Which knowledge base to build
    #[arg(long, value_enum, default_value_t = IndexMode::Keyword)]
    mode: IndexMode,

    /// Output file; defaults to the path the server reads for this mode
    #[arg(long)]
    output: Option<PathBuf>,

    /// Records per embedding request
    #[arg(long, default_value_t = 16)]
    batch_size: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum IndexMode {
    Keyword,
    Embedding,
}

impl From<IndexMode> for RetrievalMode {
    fn from(mode: IndexMode) -> Self {
        match mode {
            IndexMode::Keyword => RetrievalMode::Keyword,
            IndexMode::Embedding => RetrievalMode::Embedding,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_stdout();
    let args = Args::parse();

    let contents = fs::read_to_string(&args.dataset)
        .with_context(|| format!("Failed to read {}", args.dataset.display()))?;
    let dataset: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", args.dataset.display()))?;

    let paths = Arc::new(AppPaths::new());
    let config = ConfigService::new(paths.clone());
    let mut settings = config.load_settings()?;
    settings.retrieval.mode = args.mode.into();

    let output = args
        .output
        .unwrap_or_else(|| paths.resolve(settings.retrieval.effective_knowledge_base_path()));

    match args.mode {
        IndexMode::Keyword => {
            let file = build_keyword_file(&dataset);
            tracing::info!(
                "Indexed {} entries under {} keywords",
                file.entries.len(),
                file.keywords.token_count()
            );
            write_json_file(&output, &file)?;
        }
        IndexMode::Embedding => {
            let client = build_client(&settings.http)?;
            let provider = OpenAiEmbeddingProvider::new(
                settings.embedding.base_url.clone(),
                settings.embedding.model.clone(),
                settings.embedding.api_key.clone(),
                client,
                RetryPolicy::from_settings(&settings.http),
            );
            let file = build_embedding_file(&dataset, &provider, args.batch_size).await?;
            tracing::info!(
                "Embedded {} entries with {}",
                file.entries.len(),
                settings.embedding.model
            );
            write_json_file(&output, &file)?;
        }
    }

    tracing::info!("Wrote {}", output.display());
    Ok(())
}
