// 統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

mod test_batch;
mod test_cli;
mod test_session;
