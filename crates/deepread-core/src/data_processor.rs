use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::SourceText;

/// Reads plain-text sources from disk for local ingestion.
#[derive(Debug, Default)]
pub struct DataProcessor {
    limit: Option<usize>,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    /// Only read the first `limit` files (in path order).
    pub fn with_limit(limit: usize) -> Self { Self { limit: Some(limit) } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<SourceText>> {
        let mut files = self.list_txt_files(data_dir);
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        if let Some(limit) = self.limit {
            if files.len() > limit { files.truncate(limit); debug!(limit, "limited file count"); }
        }
        let mut sources = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!("reading file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let text = self.read_file_content(file_path)?;
            sources.push(SourceText {
                doc_id: self.extract_doc_id(file_path, data_dir),
                filename: self.extract_filename(file_path),
                text,
            });
        }
        info!(files = sources.len(), dir = %data_dir.display(), "loaded text sources");
        Ok(sources)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("failed to read {}", file_path.display()))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    /// Relative path without extension, so files with the same stem in
    /// different folders stay distinct.
    fn extract_doc_id(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        relative.with_extension("").to_string_lossy().replace('\\', "/")
    }

    fn extract_filename(&self, file_path: &Path) -> String {
        file_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort(); txt_files
    }
}
