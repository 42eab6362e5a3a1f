//! 会話ログ保存 Outbound ポート

use chrono::{DateTime, Local};
use common::error::Error;

/// 表示した会話ログ（行の列）を保存する
pub trait TranscriptStore: Send + Sync {
    /// 保存して、利用者に示すファイル名を返す
    fn save(&self, lines: &[String], now: DateTime<Local>) -> Result<String, Error>;
}
