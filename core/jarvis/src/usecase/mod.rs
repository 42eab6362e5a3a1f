//! ユースケース層
//!
//! - conversation: 会話コア（履歴・リモート呼び出し・エラー分類）
//! - chat_loop: 行単位の対話ループ

pub mod chat_loop;
pub mod conversation;

pub use chat_loop::{ChatLoop, ChatLoopDeps};
pub use conversation::{ConversationService, ConversationSettings};
