use crate::core::{CompressorResult, MAX_QUALITY};
use async_trait::async_trait;
use image::DynamicImage;
use mockall::automock;
use std::sync::Arc;

pub mod jpeg;

#[cfg(test)]
pub mod test_mocks;

/// デコード済みのラスター画像
#[derive(Debug, Clone)]
pub struct DecodedImage {
    raster: Arc<DynamicImage>,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            raster: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn raster(&self) -> &DynamicImage {
        &self.raster
    }

    pub(crate) fn shared_raster(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.raster)
    }
}

/// 0〜100の品質を0.0〜1.0の割合に変換
pub fn quality_fraction(quality: u8) -> f32 {
    f32::from(quality.min(MAX_QUALITY)) / 100.0
}

/// 画像コーデックのトレイト
///
/// 内部でリトライはしない。失敗はそのまま呼び出し元に返す。
#[automock]
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// バイト列を画像としてデコードする
    async fn decode(&self, source: &[u8]) -> CompressorResult<DecodedImage>;

    /// 品質（0.0〜1.0の割合）を指定して再エンコードする
    async fn encode(&self, image: &DecodedImage, quality: f32) -> CompressorResult<Vec<u8>>;

    /// エンコード結果のMIMEタイプ
    fn output_mime_type(&self) -> &'static str;
}

#[async_trait]
impl ImageCodec for Box<dyn ImageCodec> {
    async fn decode(&self, source: &[u8]) -> CompressorResult<DecodedImage> {
        self.as_ref().decode(source).await
    }

    async fn encode(&self, image: &DecodedImage, quality: f32) -> CompressorResult<Vec<u8>> {
        self.as_ref().encode(image, quality).await
    }

    fn output_mime_type(&self) -> &'static str {
        self.as_ref().output_mime_type()
    }
}
