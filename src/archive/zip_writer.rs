use super::ArchiveWriter;
use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// ZIP形式のアーカイブ書き込み実装
///
/// JPEGは既に圧縮済みなので無圧縮（Stored）で格納する。
#[derive(Debug, Default)]
pub struct ZipArchiveWriter {
    entries: Vec<(String, Vec<u8>)>,
    finalized: bool,
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリの親ディレクトリ一覧（出現順、重複なし）
    fn directories(&self) -> Vec<String> {
        let mut directories: Vec<String> = Vec::new();
        for (path, _) in &self.entries {
            if let Some((parent, _)) = path.rsplit_once('/') {
                let directory = format!("{parent}/");
                if !directories.contains(&directory) {
                    directories.push(directory);
                }
            }
        }
        directories
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_entry(&mut self, path: &str, data: &[u8]) {
        match self.entries.iter_mut().find(|(existing, _)| existing == path) {
            Some((_, existing_data)) => *existing_data = data.to_vec(),
            None => self.entries.push((path.to_string(), data.to_vec())),
        }
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        if self.finalized {
            anyhow::bail!("Archive has already been finalized");
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for directory in self.directories() {
            writer
                .add_directory(directory.as_str(), options)
                .with_context(|| format!("Failed to add directory: {directory}"))?;
        }

        for (path, data) in &self.entries {
            writer
                .start_file(path.as_str(), options)
                .with_context(|| format!("Failed to start archive entry: {path}"))?;
            writer
                .write_all(data)
                .with_context(|| format!("Failed to write archive entry: {path}"))?;
        }

        let cursor = writer.finish().context("Failed to finish zip archive")?;
        self.finalized = true;
        Ok(cursor.into_inner())
    }
}
