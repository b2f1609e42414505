// System status display: configured backends and which model files exist.

use colored::Colorize;

use crate::config::{ClassifierBackend, Config, SummarizerBackend};
use crate::download;
use crate::taxonomy::Taxonomy;

/// Display configuration and model status to the terminal.
pub fn show(config: &Config) {
    let taxonomy = Taxonomy::builtin();
    println!(
        "Taxonomy: {} categories, {} labels",
        taxonomy.parents().len(),
        taxonomy.child_count()
    );

    println!("Model directory: {}", config.model_dir.display());

    let nli_present = download::nli_files_present(&config.model_dir);
    let embed_present = download::embedding_files_present(&config.model_dir);

    match config.classifier_backend {
        ClassifierBackend::Onnx => {
            println!("Classifier: local ONNX ({})", presence(nli_present));
            if !nli_present {
                println!("  Run `scamwatch download-model` to fetch it");
            }
        }
        ClassifierBackend::Hf => {
            println!(
                "Classifier: hosted {} ({})",
                config.hf_zero_shot_model,
                token_state(config)
            );
        }
    }

    match config.summarizer_backend {
        SummarizerBackend::Hf => println!(
            "Summarizer: hosted {} ({})",
            config.hf_summary_model,
            token_state(config)
        ),
        SummarizerBackend::Lead => println!("Summarizer: extractive lead sentences"),
        SummarizerBackend::Off => println!("Summarizer: off (truncation only)"),
    }

    if embed_present {
        println!("Embeddings: all-MiniLM-L6-v2 ({})", presence(true));
    } else {
        println!("Embeddings: TF-IDF fallback (sentence model not downloaded)");
    }

    println!(
        "Clustering: cosine >= {:.2}, min cluster size {}",
        config.cluster_threshold, config.min_cluster_size
    );
    println!("Concurrency: {}", config.concurrency);
}

fn presence(present: bool) -> colored::ColoredString {
    if present {
        "ready".green()
    } else {
        "missing".red()
    }
}

fn token_state(config: &Config) -> colored::ColoredString {
    if config.hf_api_token.is_empty() {
        "HF_API_TOKEN not set".red()
    } else {
        "token set".green()
    }
}
