// 圧縮セッションの設定

use super::error::{CompressorError, CompressorResult};
use super::types::{DEFAULT_QUALITY, MAX_QUALITY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// セッション設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// 新規レコードの品質（0〜100）
    pub default_quality: u8,
    /// 通知の表示時間（ミリ秒）
    pub toast_duration_ms: u64,
    /// 一括ダウンロード時のアーカイブ名
    pub archive_name: String,
    /// アーカイブ内のディレクトリ名
    pub archive_directory: String,
    /// ダウンロードファイル名の接頭辞
    pub download_prefix: String,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            default_quality: DEFAULT_QUALITY,
            toast_duration_ms: 3000,
            archive_name: "compressed_images.zip".to_string(),
            archive_directory: "compressed_images".to_string(),
            download_prefix: "compressed-".to_string(),
        }
    }
}

impl CompressorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_quality(mut self, quality: u8) -> Self {
        self.default_quality = quality;
        self
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// ダウンロード用のファイル名（`compressed-<元のファイル名>`）
    pub fn download_name(&self, file_name: &str) -> String {
        format!("{}{}", self.download_prefix, file_name)
    }

    /// アーカイブ内のエントリパス
    pub fn archive_entry_path(&self, file_name: &str) -> String {
        if self.archive_directory.is_empty() {
            self.download_name(file_name)
        } else {
            format!("{}/{}", self.archive_directory, self.download_name(file_name))
        }
    }

    /// JSONから設定を読み込む
    pub fn from_json(json: &str) -> CompressorResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CompressorError::configuration(format!("JSON解析エラー: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルから読み込む
    pub fn from_file(path: &Path) -> CompressorResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompressorError::io(path.display().to_string(), e))?;
        Self::from_json(&content)
    }

    /// 設定の妥当性をチェック
    pub fn validate(&self) -> CompressorResult<()> {
        if self.default_quality > MAX_QUALITY {
            return Err(CompressorError::configuration(format!(
                "default_qualityは{MAX_QUALITY}以下である必要があります: {}",
                self.default_quality
            )));
        }

        if self.archive_name.trim().is_empty() {
            return Err(CompressorError::configuration("archive_nameが空です"));
        }

        if self.archive_directory.contains("..") {
            return Err(CompressorError::configuration(
                "archive_directoryに..は使用できません",
            ));
        }

        Ok(())
    }
}
