//! Writes a stored scrape result to disk as a Markdown document (plus the
//! structured article list, when there is one).
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use docscrape_core::ScrapeResult;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::wire::ArticleDto;

const MAX_STEM_CHARS: usize = 80;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode articles: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("nothing to export: {0}")]
    NotExportable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub markdown_path: PathBuf,
    pub articles_path: Option<PathBuf>,
    pub markdown_bytes: usize,
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ExportError::OutputDir(format!("{} is not a directory", dir.display())));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes `content` to `{dir}/{filename}` through a temp file in the same
/// directory, so readers never see a partial file.
pub fn write_atomic(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, ExportError> {
    ensure_output_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
    Ok(target)
}

/// `{source}--{title}--{hash}` where the hash is taken over the URL, so
/// exporting the same page twice overwrites the earlier file.
pub fn export_stem(result: &ScrapeResult) -> String {
    let title = markdown_title(&result.markdown).map(sanitize).unwrap_or_default();
    let hash = short_hash(&result.url);
    if title.is_empty() {
        format!("{}--{hash}", result.source.slug())
    } else {
        format!("{}--{title}--{hash}", result.source.slug())
    }
}

pub fn render_document(result: &ScrapeResult, saved_utc: &str) -> String {
    let mut doc = String::with_capacity(result.markdown.len() + 160);
    doc.push_str("---\n");
    doc.push_str(&format!("source: {}\n", result.source.slug()));
    doc.push_str(&format!("url: {}\n", result.url));
    doc.push_str(&format!("saved_utc: {saved_utc}\n"));
    doc.push_str(&format!("articles: {}\n", result.items.len()));
    doc.push_str("---\n\n");
    doc.push_str(&result.markdown);
    if !result.markdown.ends_with('\n') {
        doc.push('\n');
    }
    doc
}

pub fn export_result(
    dir: &Path,
    result: &ScrapeResult,
    saved_utc: &str,
) -> Result<ExportSummary, ExportError> {
    if !result.success {
        return Err(ExportError::NotExportable(result.message.clone()));
    }
    let stem = export_stem(result);
    let document = render_document(result, saved_utc);
    let markdown_path = write_atomic(dir, &format!("{stem}.md"), document.as_bytes())?;

    let articles_path = if result.items.is_empty() {
        None
    } else {
        let articles: Vec<ArticleDto> = result.items.iter().map(ArticleDto::from).collect();
        let json = serde_json::to_vec_pretty(&articles)?;
        Some(write_atomic(dir, &format!("{stem}.articles.json"), &json)?)
    };

    Ok(ExportSummary {
        markdown_path,
        articles_path,
        markdown_bytes: result.markdown.len(),
    })
}

fn markdown_title(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|title| !title.is_empty())
}

fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_dash = true;
    for c in input.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    let trimmed = out.trim_end_matches('-');
    trimmed.chars().take(MAX_STEM_CHARS).collect()
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
