// レコードから表示用データへの射影
//
// 表示側は独自の状態を持たない。圧縮率なども毎回レコードのサイズから計算する。

use crate::core::{CompressionState, ImageRecord};
use crate::utils::format::format_size;
use base64::{engine::general_purpose::STANDARD, Engine};

pub const PENDING_LABEL: &str = "圧縮待ち";
pub const COMPRESSING_LABEL: &str = "圧縮中...";
pub const FAILED_LABEL: &str = "圧縮失敗";

/// 1件分の表示データ
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub element_id: String,
    pub file_name: String,
    pub original_size_label: String,
    pub compressed_size_label: String,
    pub ratio_label: Option<String>,
    pub quality: u8,
    pub quality_label: String,
    pub compress_enabled: bool,
    pub download_enabled: bool,
}

/// レコードを表示データに変換する
pub fn project(record: &ImageRecord) -> RecordView {
    let compressed_size_label = if record.is_compressing {
        COMPRESSING_LABEL.to_string()
    } else {
        match record.state() {
            CompressionState::Pending => PENDING_LABEL.to_string(),
            CompressionState::Failed => FAILED_LABEL.to_string(),
            CompressionState::Compressed(size) => format_size(size),
        }
    };

    RecordView {
        element_id: record.id.to_string(),
        file_name: record.file_name.clone(),
        original_size_label: format_size(record.original_size),
        compressed_size_label,
        ratio_label: record.compression_ratio().map(|ratio| format!("{ratio:.1}%")),
        quality: record.quality,
        quality_label: format!("{}%", record.quality),
        compress_enabled: !record.is_compressing,
        download_enabled: record.download_enabled(),
    }
}

/// 全レコードを表示順に変換する
pub fn project_all(records: &[ImageRecord]) -> Vec<RecordView> {
    records.iter().map(project).collect()
}

/// プレビュー用の`data:`URLを作成
pub fn preview_data_url(mime_type: &str, data: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(data))
}

/// 元画像のプレビュー
pub fn original_preview(record: &ImageRecord) -> String {
    preview_data_url(&record.mime_type, &record.source)
}

/// 圧縮後のプレビュー（未圧縮なら`None`）
pub fn compressed_preview(record: &ImageRecord, output_mime_type: &str) -> Option<String> {
    record
        .compressed
        .as_ref()
        .filter(|_| record.download_enabled())
        .map(|bytes| preview_data_url(output_mime_type, bytes))
}
