//! Gemini プロバイダの実装（generateContent を blocking reqwest で呼ぶ）

use crate::domain::ApiKey;
use crate::error::Error;
use crate::llm::provider::{GenerateRequest, GenerateResponse, LlmProvider};
use crate::msg::Role;
use serde_json::{json, Value};
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini プロバイダ
///
/// 既定ではタイムアウトを設けない（応答か送信エラーまで待つ）。
pub struct GeminiProvider {
    api_key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    client: reqwest::blocking::Client,
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::blocking::Client, Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::http(format!("failed to build HTTP client: {}", e)))
}

impl GeminiProvider {
    /// 新しい Gemini プロバイダを作成
    pub fn new(api_key: ApiKey) -> Result<Self, Error> {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// ベース URL を差し替えて作成（プロキシや互換エンドポイント向け）
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            client: build_client(None)?,
        })
    }

    /// リクエスト全体の上限時間を設定する（None で無制限）
    pub fn with_timeout(self, timeout: Option<Duration>) -> Result<Self, Error> {
        Ok(Self {
            timeout,
            client: build_client(timeout)?,
            ..self
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn endpoint(&self, request: &GenerateRequest) -> String {
        format!("{}/models/{}:generateContent", self.base_url, request.model)
    }

    /// リクエストペイロードを生成
    ///
    /// Gemini API は "assistant" ではなく "model" という role を使用する。
    pub fn make_request_payload(request: &GenerateRequest) -> Value {
        let contents: Vec<Value> = request
            .contents
            .iter()
            .map(|turn| {
                let role = match turn.role() {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                json!({ "role": role, "parts": [{ "text": turn.text() }] })
            })
            .collect();
        let safety: Vec<Value> = request
            .safety_settings
            .iter()
            .map(|s| json!({ "category": s.category.as_str(), "threshold": s.threshold.as_str() }))
            .collect();
        json!({
            "contents": contents,
            "safetySettings": safety,
        })
    }

    fn make_http_request(&self, url: &str, request_json: &str) -> Result<String, Error> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.api_key.expose())
            .body(request_json.to_string())
            .send()
            .map_err(send_error)?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(api_error(&format!("HTTP {}", status), &response_text));
        }

        Ok(response_text)
    }

    /// レスポンス本体を JSON として読む。本体に error があれば API エラー
    pub fn decode_response(response_text: &str) -> Result<GenerateResponse, Error> {
        let v: Value = serde_json::from_str(response_text)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;
        if let Some(error) = v.get("error") {
            let error_msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("Gemini API error: {}", error_msg)));
        }
        Ok(GenerateResponse::new(v))
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error> {
        let payload = Self::make_request_payload(request);
        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;
        let response_text = self.make_http_request(&self.endpoint(request), &request_json)?;
        Self::decode_response(&response_text)
    }
}

/// 送信失敗を分類しやすいメッセージに変換する（timeout / connection を含める）
fn send_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::http(format!("request timeout: {}", e))
    } else if e.is_connect() {
        Error::http(format!("connection failed: {}", e))
    } else {
        Error::http(format!("HTTP request failed: {}", e))
    }
}

/// 非 2xx レスポンスからメッセージを取り出す（error.message が無ければ本体をそのまま）
fn api_error(status: &str, response_text: &str) -> Error {
    let error_msg = serde_json::from_str::<Value>(response_text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| format!("{}: {}", status, response_text));
    Error::http(format!("Gemini API error: {}", error_msg))
}
