//! LLMプロバイダのトレイトとリクエスト・レスポンス型

use crate::domain::ModelName;
use crate::error::Error;
use crate::llm::safety::SafetySetting;
use crate::msg::Turn;
use serde::Deserialize;
use serde_json::{json, Value};

/// LLMプロバイダのトレイト
///
/// 会話サービスはこの trait 経由でのみリモート API を呼ぶ。テストではスタブを注入する。
pub trait LlmProvider: Send + Sync {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// 会話全体を送って応答を取得する（同期呼び出し）
    ///
    /// # Returns
    /// * `Ok(GenerateResponse)` - JSON として受け取れたレスポンス本体（中身の形は未検証）
    /// * `Err(Error)` - 通信・認証・クォータ・API エラー・JSON でない本体
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error>;
}

/// 生成リクエスト（モデル名・会話全体・モデレーション設定）
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: ModelName,
    pub contents: Vec<Turn>,
    pub safety_settings: Vec<SafetySetting>,
}

/// 生成レスポンス本体
///
/// 形の検証は取り出し時（first_part_text）まで遅らせる。
/// 取り出しの失敗は通信エラーとは別扱いにするため。
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    body: Value,
}

// candidates[].content.parts[].text だけを読むための型。全て省略可能
#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// テキスト 1 パートの応答
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text.into() }] },
                "finishReason": "STOP"
            }]
        }))
    }

    /// 候補なしの応答（モデレーションでブロックされた場合など）
    pub fn empty() -> Self {
        Self::new(json!({ "candidates": [] }))
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// 先頭候補の先頭パートのテキストを取り出す
    ///
    /// * `Ok(Some(text))` - テキストあり
    /// * `Ok(None)` - 候補・content・parts のいずれかが無い／空
    /// * `Err(Error)` - 想定外の形（配列でない、先頭パートにテキストが無い等）
    pub fn first_part_text(&self) -> Result<Option<String>, Error> {
        let decoded: ResponseBody = serde_json::from_value(self.body.clone())
            .map_err(|e| Error::json(format!("Unexpected response structure: {}", e)))?;
        let first_part = decoded
            .candidates
            .and_then(|cs| cs.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|content| content.parts)
            .and_then(|parts| parts.into_iter().next());
        match first_part {
            None => Ok(None),
            Some(part) => part
                .text
                .map(Some)
                .ok_or_else(|| Error::json("First response part has no text")),
        }
    }

    /// 停止・ブロック理由（promptFeedback.blockReason または先頭候補の finishReason）。ログ用
    pub fn stop_reason(&self) -> Option<&str> {
        self.body["promptFeedback"]["blockReason"]
            .as_str()
            .or_else(|| self.body["candidates"][0]["finishReason"].as_str())
    }
}
