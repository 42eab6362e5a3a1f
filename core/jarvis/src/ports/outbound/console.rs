//! 行単位コンソール Outbound ポート
//!
//! 対話ループはこの trait 経由でのみ入力を読み、出力を書く。

use common::error::Error;

/// 行単位の入出力
pub trait Console: Send + Sync {
    /// プロンプトを表示して 1 行読む。入力終端（EOF）なら None
    fn read_line(&self, prompt: &str) -> Result<Option<String>, Error>;

    /// 1 行出力する
    fn print_line(&self, line: &str) -> Result<(), Error>;
}
