use crate::source::{local::LocalFileSource, FileSource, SourceItem};
use crate::utils::format::{format_size, is_image_mime};
use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;

/// アップロード時の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectStatus {
    Upload,
    /// 画像以外のため除外される
    Skipped,
    /// 同じ名前とサイズのファイルが先にある
    Duplicate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectEntry {
    pub item: SourceItem,
    pub status: InspectStatus,
}

/// 入力ファイルがアップロード時にどう扱われるかを判定する
pub async fn inspect_inputs<S>(source: &S, inputs: &[PathBuf]) -> Result<Vec<InspectEntry>>
where
    S: FileSource + ?Sized,
{
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for input in inputs {
        for item in source.list_files(input).await? {
            let status = if !is_image_mime(&item.mime_type) {
                InspectStatus::Skipped
            } else if !seen.insert((item.name.clone(), item.size)) {
                InspectStatus::Duplicate
            } else {
                InspectStatus::Upload
            };
            entries.push(InspectEntry { item, status });
        }
    }

    Ok(entries)
}

/// Execute inspect command
pub async fn execute_inspect(inputs: Vec<PathBuf>, recursive: bool) -> Result<()> {
    let source = LocalFileSource::new().recursive(recursive);
    let entries = inspect_inputs(&source, &inputs).await?;

    println!("🔍 入力ファイル一覧 ({}件)", entries.len());
    for entry in &entries {
        let mark = match entry.status {
            InspectStatus::Upload => "✅",
            InspectStatus::Skipped => "⏭️ ",
            InspectStatus::Duplicate => "⚠️ ",
        };
        println!(
            "   {mark} {} ({}, {})",
            entry.item.id,
            format_size(entry.item.size),
            entry.item.mime_type
        );
    }

    let uploads = entries
        .iter()
        .filter(|e| e.status == InspectStatus::Upload)
        .count();
    println!("📊 アップロード対象: {uploads}枚");
    Ok(())
}
