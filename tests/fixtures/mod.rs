// テストユーティリティ
// 画像データの生成と、タイミングを制御できるコーデック


// 公開API
pub use codecs::*;
pub use images::*;
