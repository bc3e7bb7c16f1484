use crate::codec::jpeg::JpegCodec;
use crate::core::{BatchSummary, CompressionState, CompressorConfig};
use crate::download::DirectorySink;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::source::{collect_candidates, local::LocalFileSource};
use crate::utils::format::format_size;
use crate::CompressorApp;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Configuration struct for compress command to reduce argument count
#[derive(Debug, Clone)]
pub struct CompressCommandConfig {
    pub inputs: Vec<PathBuf>,
    pub quality: Option<u8>,
    pub output: PathBuf,
    pub archive: bool,
    pub recursive: bool,
    pub config_file: Option<PathBuf>,
}

/// 実行結果のまとめ
#[derive(Debug, Clone, Default)]
pub struct CompressRunSummary {
    pub uploaded: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub batch: BatchSummary,
    /// 保存先（個別ファイルまたはアーカイブ）
    pub saved: Vec<String>,
    pub save_failures: usize,
}

/// 設定ファイルとCLIフラグから設定を組み立てる（フラグが優先）
pub fn load_compressor_config(config_file: Option<&Path>, quality: Option<u8>) -> Result<CompressorConfig> {
    let config = match config_file {
        Some(path) => CompressorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CompressorConfig::default(),
    };

    let config = match quality {
        Some(quality) => config.with_default_quality(quality),
        None => config,
    };
    config.validate()?;
    Ok(config)
}

/// Execute compress command
pub async fn execute_compress(config: CompressCommandConfig) -> Result<()> {
    println!("🗜️  画像圧縮開始");
    println!("   - 入力: {}件", config.inputs.len());
    println!("   - 出力ディレクトリ: {}", config.output.display());

    let summary = run_compress(&config, ConsoleNotifier::new()).await?;

    println!("✅ 圧縮完了!");
    println!("   - 追加: {}枚", summary.uploaded);
    println!("   - 重複: {}枚", summary.duplicates);
    println!("   - 画像以外: {}件", summary.skipped);
    println!("   - 成功: {}枚", summary.batch.succeeded);
    println!("   - 失敗: {}枚", summary.batch.failed);
    if summary.save_failures > 0 {
        println!("⚠️  {}個のファイルを保存できませんでした", summary.save_failures);
    }
    for location in &summary.saved {
        println!("📄 {location}");
    }
    Ok(())
}

/// 圧縮コマンドの本体（通知先を差し替え可能）
pub async fn run_compress<N>(config: &CompressCommandConfig, notifier: N) -> Result<CompressRunSummary>
where
    N: Notifier,
{
    let compressor_config =
        load_compressor_config(config.config_file.as_deref(), config.quality)?;

    let source = LocalFileSource::new().recursive(config.recursive);
    let candidates = collect_candidates(&source, config.inputs.as_slice()).await?;

    let app = CompressorApp::new(
        JpegCodec::new(),
        notifier,
        DirectorySink::new(&config.output),
        compressor_config,
    );

    let report = app.upload(candidates);
    let mut summary = CompressRunSummary {
        uploaded: report.added.len(),
        duplicates: report.duplicates.len(),
        skipped: report.skipped.len(),
        ..CompressRunSummary::default()
    };

    summary.batch = app.compress_all().await;

    if config.archive {
        if app.export_all().await?.is_some() {
            summary
                .saved
                .push(config.output.join(&app.config().archive_name).display().to_string());
        }
    } else {
        for record in app.store().list() {
            let CompressionState::Compressed(size) = record.state() else {
                continue;
            };
            // 保存失敗は通知済みなので残りの画像の保存を続ける
            match app.download_one(record.id).await {
                Ok(location) => {
                    tracing::debug!(
                        file = %record.file_name,
                        original = %format_size(record.original_size),
                        compressed = %format_size(size),
                        "saved"
                    );
                    summary.saved.push(location);
                }
                Err(error) => {
                    tracing::warn!(file = %record.file_name, %error, "save failed, continuing");
                    summary.save_failures += 1;
                }
            }
        }
    }

    Ok(summary)
}
