//! Outbound ポート: 対話ループが外界（コンソール・保存先）を使うための trait
//!
//! LLM・ログ・時刻・FS は common の ports を使う。

pub mod console;
pub mod transcript_store;

pub use console::Console;
pub use transcript_store::TranscriptStore;
