//! Jarvis 共通ライブラリ
//!
//! 会話ターンの型、リモートモデルクライアント、Outbound ポートと標準アダプタを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// 会話ターン（Turn / Role）
pub mod msg;

/// LLMプロバイダ
pub mod llm;

/// Ports & Adapters
pub mod ports;
pub mod adapter;
