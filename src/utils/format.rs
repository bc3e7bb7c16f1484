// サイズ表示と圧縮率の計算

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const BASE: f64 = 1024.0;

/// バイト数を人間が読める形式に変換（1024単位、小数点以下2桁）
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // 浮動小数点のlog誤差を避けるため整数で単位を選ぶ
    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let scaled = bytes as f64 / BASE.powi(exponent as i32);

    format!("{} {}", trim_decimal(round_to(scaled, 2)), UNITS[exponent])
}

/// base64ペイロードのデコード後バイト数を長さだけから求める
///
/// `data:`URLの場合はカンマ以降のみを対象にする。
pub fn encoded_size_from_payload(payload: &str) -> u64 {
    let body = match payload.split_once(',') {
        Some((_, body)) => body,
        None => payload,
    };
    let body = body.trim_end();

    let padding = body.bytes().rev().take(2).filter(|&b| b == b'=').count();
    (body.len() as u64 * 3 / 4).saturating_sub(padding as u64)
}

/// 圧縮率（%）を小数点以下1桁で計算
///
/// 圧縮後の方が大きい場合は負の値になる。
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let ratio = (original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0;
    round_to(ratio, 1)
}

/// 画像のMIMEタイプかどうか
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// 1.50 -> 1.5, 1.00 -> 1
fn trim_decimal(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
