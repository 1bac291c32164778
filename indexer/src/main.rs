use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::persist::{save_index, IndexPaths};
use engine::tokenizer::tokenize;
use engine::{Corpus, InvertedIndex};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    /// Already-normalized terms; used verbatim when present.
    #[serde(default)]
    tokens: Option<Vec<String>>,
    /// Raw text, run through the standard pipeline when `tokens` is absent.
    #[serde(default)]
    body: Option<String>,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a ranked-retrieval index from document files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Build partitioned across worker threads
        #[arg(long, default_value_t = true)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, parallel } => build(&input, &output, parallel),
    }
}

fn build(input: &str, output: &str, parallel: bool) -> Result<()> {
    let input_path = Path::new(input);

    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }

    let mut corpus = Corpus::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            ingest_jsonl(&file, &mut corpus)?;
        } else {
            ingest_json(&file, &mut corpus)?;
        }
    }
    tracing::info!(num_docs = corpus.len(), "corpus assembled");

    let index = if parallel {
        InvertedIndex::build_parallel(&corpus)
    } else {
        InvertedIndex::build(&corpus)
    };
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index built");

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::new());
    save_index(&IndexPaths::new(output), &index, created_at)?;
    tracing::info!(output, "index build complete");
    Ok(())
}

fn ingest_jsonl(file: &Path, corpus: &mut Corpus) -> Result<()> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    let reader = BufReader::new(f);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)?;
        ingest_doc(doc, corpus)?;
    }
    Ok(())
}

fn ingest_json(file: &Path, corpus: &mut Corpus) -> Result<()> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                ingest_doc(doc, corpus)?;
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            ingest_doc(doc, corpus)?;
        }
        _ => {}
    }
    Ok(())
}

fn ingest_doc(doc: InputDoc, corpus: &mut Corpus) -> Result<()> {
    let tokens = match doc.tokens {
        Some(tokens) => tokens,
        None => tokenize(doc.body.as_deref().unwrap_or("")),
    };
    corpus.push(doc.id, tokens)?;
    Ok(())
}
