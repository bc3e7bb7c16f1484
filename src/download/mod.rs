use anyhow::{Context, Result};
use async_trait::async_trait;
use mockall::automock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// クライアント側の保存先を抽象化するトレイト
#[automock]
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// ペイロードを指定したファイル名で保存し、保存先を返す
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<String>;
}

#[async_trait]
impl<D: DownloadSink + ?Sized> DownloadSink for Arc<D> {
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<String> {
        self.as_ref().save(file_name, data).await
    }
}

/// ローカルディレクトリに保存する実装
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<String> {
        // ファイル名だけを受け付け、保存先ディレクトリの外には書かない
        let name = Path::new(file_name)
            .file_name()
            .filter(|name| name.len() == file_name.len())
            .with_context(|| format!("Invalid download file name: {file_name}"))?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create directory: {}", self.directory.display()))?;

        let path = self.directory.join(name);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        Ok(path.display().to_string())
    }
}

/// メモリ内に保存する実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryDownloadSink {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryDownloadSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用：保存されたファイルを取得
    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(file_name).cloned()
    }

    /// テスト用：保存されたファイル名一覧
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait]
impl DownloadSink for MemoryDownloadSink {
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<String> {
        self.files
            .lock()
            .map_err(|_| anyhow::anyhow!("download sink lock poisoned"))?
            .insert(file_name.to_string(), data.to_vec());
        Ok(format!("memory://{file_name}"))
    }
}
