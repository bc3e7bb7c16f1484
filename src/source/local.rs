use super::{guess_mime_type, FileSource, SourceItem};
use crate::core::UploadCandidate;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ローカルファイルシステムから画像を読み込むアップロード元
#[derive(Debug, Clone, Default)]
pub struct LocalFileSource {
    recursive: bool,
}

impl LocalFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// サブディレクトリも辿る
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn path_to_source_item(path: &Path) -> Result<SourceItem> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Ok(SourceItem {
            id: path.to_string_lossy().to_string(),
            name,
            size: metadata.len(),
            mime_type: guess_mime_type(path).to_string(),
        })
    }

    fn walk(root: &Path, recursive: bool) -> Vec<PathBuf> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        // 選択順を安定させる
        files.sort();
        files
    }
}

#[async_trait]
impl FileSource for LocalFileSource {
    async fn list_files(&self, path: &Path) -> Result<Vec<SourceItem>> {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read path: {}", path.display()))?;

        if metadata.is_file() {
            return Ok(vec![Self::path_to_source_item(path)?]);
        }

        let root = path.to_path_buf();
        let recursive = self.recursive;
        let files = tokio::task::spawn_blocking(move || Self::walk(&root, recursive))
            .await
            .context("Directory walk task panicked")?;

        Ok(files
            .iter()
            .filter_map(|file| Self::path_to_source_item(file).ok())
            .collect())
    }

    async fn read_candidate(&self, item: &SourceItem) -> Result<UploadCandidate> {
        let data = tokio::fs::read(&item.id)
            .await
            .with_context(|| format!("Failed to read file: {}", item.id))?;
        Ok(UploadCandidate::new(&item.name, &item.mime_type, data))
    }
}
