//! テスト用: 台本どおりに応答・エラーを返す LlmProvider 実装


#[cfg(test)]
pub use stub::{Scripted, StubLlm};
