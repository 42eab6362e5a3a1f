//! jarvis コマンドの enum（Command Pattern）
//!
//! 対話ループ vs 単発メッセージの分岐を enum で明示する。

/// jarvis の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum JarvisCommand {
    /// ヘルプ表示
    Help,
    /// 対話ループ（メッセージ未指定）
    Chat,
    /// 単発メッセージを送り、応答を表示して終了
    Ask { message: String },
}
