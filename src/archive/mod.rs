use anyhow::Result;
use mockall::automock;

pub mod zip_writer;

pub use zip_writer::ZipArchiveWriter;

/// アーカイブ書き込みのトレイト
///
/// エントリは`finalize`まで蓄積される。同じパスへの追加は後勝ち。
#[automock]
pub trait ArchiveWriter: Send {
    /// エントリを追加する
    fn add_entry(&mut self, path: &str, data: &[u8]);

    /// 追加済みのエントリ数
    fn entry_count(&self) -> usize;

    /// アーカイブを1つのペイロードにまとめる
    fn finalize(&mut self) -> Result<Vec<u8>>;
}
