//! 対話ループの入力 1 行の解釈（スラッシュコマンド or メッセージ）

/// ヘルプに表示するコマンド一覧（表示順）
pub const COMMANDS: [(&str, &str); 4] = [
    ("/help", "Show this help message"),
    ("/clear", "Clear chat history"),
    ("/save", "Save chat history to a file"),
    ("/exit", "Exit the program (also /quit or bye)"),
];

/// 対話ループへの 1 行入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Clear,
    Save,
    Exit,
    /// モデルへ送るメッセージ（入力そのまま）
    Message(String),
}

impl ChatCommand {
    /// 1 行を解釈する。空白のみの行は None（何もしない）
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let cmd = match trimmed.to_lowercase().as_str() {
            "/exit" | "/quit" | "bye" | "exit" | "quit" => ChatCommand::Exit,
            "/help" => ChatCommand::Help,
            "/clear" => ChatCommand::Clear,
            "/save" => ChatCommand::Save,
            _ => ChatCommand::Message(line.to_string()),
        };
        Some(cmd)
    }
}
