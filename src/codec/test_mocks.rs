// テスト用のコーデック実装

use super::{DecodedImage, ImageCodec};
use crate::core::{CompressorError, CompressorResult};
use async_trait::async_trait;
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// `BROKEN`で始まる入力はデコード失敗として扱う
pub const BROKEN_PREFIX: &[u8] = b"BROKEN";

/// 固定長の出力を返すフェイクコーデック
#[derive(Clone)]
pub struct FakeCodec {
    pub output_len: usize,
    pub decode_calls: Arc<AtomicUsize>,
    pub encode_qualities: Arc<std::sync::Mutex<Vec<f32>>>,
    gate: Option<Arc<Notify>>,
    fail_encode: bool,
}

impl FakeCodec {
    pub fn new(output_len: usize) -> Self {
        Self {
            output_len,
            decode_calls: Arc::new(AtomicUsize::new(0)),
            encode_qualities: Arc::new(std::sync::Mutex::new(Vec::new())),
            gate: None,
            fail_encode: false,
        }
    }

    /// デコードが`Notify`で解放されるまで待機するコーデック
    pub fn gated(output_len: usize, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(output_len)
        }
    }

    pub fn failing_encode() -> Self {
        Self {
            fail_encode: true,
            ..Self::new(1)
        }
    }

    pub fn decode_count(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageCodec for FakeCodec {
    async fn decode(&self, source: &[u8]) -> CompressorResult<DecodedImage> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if source.starts_with(BROKEN_PREFIX) {
            return Err(CompressorError::decode(anyhow::anyhow!("unreadable payload")));
        }
        Ok(DecodedImage::new(DynamicImage::new_rgb8(4, 4)))
    }

    async fn encode(&self, _image: &DecodedImage, quality: f32) -> CompressorResult<Vec<u8>> {
        self.encode_qualities.lock().unwrap().push(quality);
        if self.fail_encode {
            return Err(CompressorError::encode("encoder rejected the image"));
        }
        Ok(vec![0xAB; self.output_len])
    }

    fn output_mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}
