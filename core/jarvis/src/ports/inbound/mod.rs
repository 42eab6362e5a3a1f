//! Inbound ポート: 表示面が会話コアを呼び出すインターフェース

/// 会話コア
///
/// どちらの操作も失敗を返さない。戻り値は常にそのまま表示できる文字列。
/// 1 インスタンスにつき同時に 1 呼び出しまで（&mut self で保証する）。
pub trait Conversation: Send {
    /// ユーザーのメッセージを送り、応答（またはエラー時の案内文）を返す
    fn converse(&mut self, user_text: &str) -> String;

    /// 会話履歴を空にし、確認メッセージを返す
    fn reset(&mut self) -> String;
}

/// CLI 設定を受け取って実行する入口（main からの呼び出し用）
pub trait UseCaseRunner {
    fn run(&mut self, config: crate::cli::Config) -> Result<i32, common::error::Error>;
}
