use crate::core::UploadCandidate;
use crate::utils::format::is_image_mime;
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

pub mod local;

/// MIMEタイプが判別できないファイルに付けるタイプ
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// アップロード元のファイルを表す構造体
#[derive(Debug, Clone, PartialEq)]
pub struct SourceItem {
    /// アイテムの識別子（ローカルならパス）
    pub id: String,
    /// ファイル名
    pub name: String,
    /// サイズ（バイト）
    pub size: u64,
    /// 拡張子から推定したMIMEタイプ
    pub mime_type: String,
}

/// 拡張子からMIMEタイプを推定
pub fn guess_mime_type(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

/// アップロード元を抽象化するトレイト
#[automock]
#[async_trait]
pub trait FileSource: Send + Sync {
    /// パス（ファイルまたはディレクトリ）に含まれるファイルをリストする
    async fn list_files(&self, path: &Path) -> Result<Vec<SourceItem>>;

    /// アイテムを読み込んでアップロード候補にする
    async fn read_candidate(&self, item: &SourceItem) -> Result<UploadCandidate>;
}

/// 複数のパスからアップロード候補を集める
///
/// 画像以外のファイルは読み込まず、中身が空の候補として返す（アップロード時に除外される）。
pub async fn collect_candidates<S>(source: &S, paths: &[impl AsRef<Path>]) -> Result<Vec<UploadCandidate>>
where
    S: FileSource + ?Sized,
{
    let mut candidates = Vec::new();
    for path in paths {
        for item in source.list_files(path.as_ref()).await? {
            let candidate = if is_image_mime(&item.mime_type) {
                source.read_candidate(&item).await?
            } else {
                UploadCandidate::new(item.name, item.mime_type, Vec::new())
            };
            candidates.push(candidate);
        }
    }
    Ok(candidates)
}
