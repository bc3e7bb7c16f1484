// CLIコマンドの統合テスト
use crate::fixtures::*;
use image_squeeze::{
    cli::{inspect_inputs, run_compress, CompressCommandConfig, InspectStatus},
    notify::{MemoryNotifier, Notification},
    source::local::LocalFileSource,
};
use tempfile::TempDir;

fn compress_command(inputs: Vec<std::path::PathBuf>, output: &std::path::Path) -> CompressCommandConfig {
    CompressCommandConfig {
        inputs,
        quality: None,
        output: output.to_path_buf(),
        archive: false,
        recursive: true,
        config_file: None,
    }
}

#[tokio::test]
async fn test_compress_directory_recursively() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let nested = input.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_png(input.path(), "top.png", 32, 32);
    write_png(&nested, "deep.png", 32, 32);

    let summary = run_compress(
        &compress_command(vec![input.path().to_path_buf()], output.path()),
        MemoryNotifier::new(),
    )
    .await
    .unwrap();

    assert_eq!(summary.uploaded, 2);
    assert_eq!(summary.batch.succeeded, 2);
    assert!(output.path().join("compressed-top.png").exists());
    assert!(output.path().join("compressed-deep.png").exists());
}

#[tokio::test]
async fn test_compress_same_file_twice_is_duplicate() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(input.path(), "a.png", 16, 16);
    let file = input.path().join("a.png");

    let notifier = MemoryNotifier::new();
    let summary = run_compress(
        &compress_command(vec![file.clone(), file], output.path()),
        notifier.clone(),
    )
    .await
    .unwrap();

    assert_eq!(summary.uploaded, 1);
    assert_eq!(summary.duplicates, 1);
    assert!(notifier.received().contains(&Notification::DuplicateUpload {
        file_name: "a.png".to_string()
    }));
}

#[tokio::test]
async fn test_compress_uses_config_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(input.path(), "a.png", 16, 16);
    let config_path = input.path().join("settings.json");
    std::fs::write(
        &config_path,
        r#"{"archive_name": "bundle.zip", "archive_directory": "", "download_prefix": "small-"}"#,
    )
    .unwrap();

    let mut command = compress_command(vec![input.path().join("a.png")], output.path());
    command.archive = true;
    command.config_file = Some(config_path);

    run_compress(&command, MemoryNotifier::new()).await.unwrap();

    let bytes = std::fs::read(output.path().join("bundle.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.by_index(0).unwrap().name(), "small-a.png");
}

#[tokio::test]
async fn test_compress_rejects_invalid_config() {
    let input = TempDir::new().unwrap();
    let config_path = input.path().join("settings.json");
    std::fs::write(&config_path, r#"{"default_quality": 250}"#).unwrap();

    let mut command = compress_command(vec![input.path().to_path_buf()], input.path());
    command.config_file = Some(config_path);

    assert!(run_compress(&command, MemoryNotifier::new()).await.is_err());
}

#[tokio::test]
async fn test_inspect_reports_upload_plan() {
    let input = TempDir::new().unwrap();
    write_png(input.path(), "a.png", 8, 8);
    std::fs::write(input.path().join("b.txt"), b"text").unwrap();

    let entries = inspect_inputs(&LocalFileSource::new(), &[input.path().to_path_buf()])
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].status, InspectStatus::Upload);
    assert_eq!(entries[1].status, InspectStatus::Skipped);
}
