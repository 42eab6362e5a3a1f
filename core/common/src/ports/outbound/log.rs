//! ログ出力 Outbound ポート
//!
//! 会話サービス・対話ループ・CLI の出来事を構造化レコードとして残す。
//! 利用者に見せる表示とは別経路で、書き込みの失敗は呼び出し側で無視してよい。

use crate::error::Error;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// RFC3339（UTC）の現在時刻
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// 重要度。シリアライズ時は小文字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// 構造化ログの 1 レコード
///
/// layer は出どころ（cli / usecase / adapter / wiring）、kind は出来事の種類
/// （lifecycle / history / response / api_error / file_error / config）。
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ts: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Value>>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            ts: now_iso8601(),
            level,
            message: message.into(),
            layer: None,
            kind: None,
            fields: None,
        }
    }

    pub fn layer(self, layer: &str) -> Self {
        Self {
            layer: Some(layer.to_string()),
            ..self
        }
    }

    pub fn kind(self, kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            ..self
        }
    }

    /// fields にキーを 1 つ足す（同じキーは上書き）
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.into());
        self
    }
}

/// ログの書き出し先
pub trait Log: Send + Sync {
    fn log(&self, record: &LogRecord) -> Result<(), Error>;
}
