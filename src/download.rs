// Model download helper for the local ONNX models.
//
// Two models from HuggingFace:
// 1. distilbert-base-uncased-mnli: zero-shot classification via NLI (~67MB quantized)
// 2. all-MiniLM-L6-v2: sentence embeddings for topic clustering (~90MB)
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/scamwatch/models/ on Linux) so they persist across runs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// One file to fetch: path in the HF repo, local name, and whether it's big
/// enough to deserve a progress bar.
struct RemoteFile {
    remote: &'static str,
    local: &'static str,
    large: bool,
}

struct ModelSource {
    label: &'static str,
    repo_url: &'static str,
    dir_name: &'static str,
    files: &'static [RemoteFile],
}

const NLI_MODEL: ModelSource = ModelSource {
    label: "Zero-shot NLI model (distilbert-base-uncased-mnli)",
    repo_url: "https://huggingface.co/Xenova/distilbert-base-uncased-mnli/resolve/main",
    dir_name: "distilbert-base-uncased-mnli",
    files: &[
        RemoteFile {
            remote: "config.json",
            local: "config.json",
            large: false,
        },
        RemoteFile {
            remote: "tokenizer.json",
            local: "tokenizer.json",
            large: false,
        },
        RemoteFile {
            remote: "onnx/model_quantized.onnx",
            local: "model.onnx",
            large: true,
        },
    ],
};

const EMBEDDING_MODEL: ModelSource = ModelSource {
    label: "Sentence embedding model (all-MiniLM-L6-v2)",
    repo_url: "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main",
    dir_name: "all-MiniLM-L6-v2",
    files: &[
        RemoteFile {
            remote: "tokenizer.json",
            local: "tokenizer.json",
            large: false,
        },
        RemoteFile {
            remote: "onnx/model.onnx",
            local: "model.onnx",
            large: true,
        },
    ],
};

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/scamwatch/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scamwatch")
        .join("models")
}

/// Subdirectory within model_dir for the zero-shot NLI model.
pub fn nli_model_dir(base: &Path) -> PathBuf {
    base.join(NLI_MODEL.dir_name)
}

/// Subdirectory within model_dir for the sentence embedding model.
pub fn embedding_model_dir(base: &Path) -> PathBuf {
    base.join(EMBEDDING_MODEL.dir_name)
}

fn files_present(base: &Path, source: &ModelSource) -> bool {
    let dir = base.join(source.dir_name);
    source.files.iter().all(|f| dir.join(f.local).exists())
}

/// Whether every zero-shot model file exists.
pub fn nli_files_present(base: &Path) -> bool {
    files_present(base, &NLI_MODEL)
}

/// Whether every embedding model file exists.
pub fn embedding_files_present(base: &Path) -> bool {
    files_present(base, &EMBEDDING_MODEL)
}

/// Download both ONNX models. Skips files that already exist.
pub async fn download_models(dir: &Path) -> Result<()> {
    for source in [&NLI_MODEL, &EMBEDDING_MODEL] {
        download_source(dir, source).await?;
    }
    Ok(())
}

async fn download_source(base: &Path, source: &ModelSource) -> Result<()> {
    println!("\n{}:", source.label);

    let dir = base.join(source.dir_name);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    for file in source.files {
        let dest = dir.join(file.local);
        if dest.exists() {
            info!(file = file.local, "Model file already exists, skipping");
            println!("  {} (already exists)", file.local);
            continue;
        }
        println!("  Downloading {}...", file.local);
        download_file(
            &format!("{}/{}", source.repo_url, file.remote),
            &dest,
            file.large,
        )
        .await?;
    }

    Ok(())
}

/// Download a single file, writing to `<dest>.part` and renaming on success
/// so an interrupted download never looks complete.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        Some(progress_bar(response.content_length())?)
    } else {
        None
    };

    let partial = dest.with_extension("part");
    let mut file = std::fs::File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }
    file.flush()
        .with_context(|| format!("Failed to flush {}", partial.display()))?;
    drop(file);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

fn progress_bar(total_size: Option<u64>) -> Result<ProgressBar> {
    let pb = match total_size {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .context("invalid progress template")?
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .context("invalid progress template")?,
            );
            pb
        }
    };
    Ok(pb)
}
