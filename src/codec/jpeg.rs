use super::{DecodedImage, ImageCodec};
use crate::core::{CompressorError, CompressorResult};
use anyhow::Context;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

/// `image`クレートによるJPEG再エンコード実装
///
/// 入力形式はデコーダーが対応するものなら何でもよく、出力は常にJPEG。
#[derive(Clone, Debug, Default)]
pub struct JpegCodec;

impl JpegCodec {
    pub fn new() -> Self {
        Self
    }

    /// 割合をJPEGの品質値（1〜100）に変換
    fn jpeg_quality(quality: f32) -> CompressorResult<u8> {
        if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
            return Err(CompressorError::encode(format!(
                "品質は0.0〜1.0の範囲である必要があります: {quality}"
            )));
        }
        Ok(((quality * 100.0).round() as u8).clamp(1, 100))
    }
}

#[async_trait]
impl ImageCodec for JpegCodec {
    async fn decode(&self, source: &[u8]) -> CompressorResult<DecodedImage> {
        let image = tokio::task::spawn_blocking({
            let data = source.to_vec();
            move || image::load_from_memory(&data)
        })
        .await
        .context("Failed to spawn blocking task for image decoding")
        .and_then(|result| result.context("Failed to decode image from memory"))
        .map_err(CompressorError::decode)?;

        Ok(DecodedImage::new(image))
    }

    async fn encode(&self, image: &DecodedImage, quality: f32) -> CompressorResult<Vec<u8>> {
        let jpeg_quality = Self::jpeg_quality(quality)?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CompressorError::encode(format!(
                "画像サイズが不正です: {width}x{height}"
            )));
        }

        let encoded = tokio::task::spawn_blocking({
            let raster = image.shared_raster();
            move || {
                // JPEGはアルファを持たないのでRGBに変換する
                let rgb = raster.to_rgb8();
                let mut buffer = Vec::new();
                JpegEncoder::new_with_quality(&mut buffer, jpeg_quality).encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )?;
                Ok::<_, image::ImageError>(buffer)
            }
        })
        .await
        .map_err(|e| CompressorError::encode(format!("エンコードタスクが失敗しました: {e}")))?
        .map_err(|e| CompressorError::encode(e.to_string()))?;

        Ok(encoded)
    }

    fn output_mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}
