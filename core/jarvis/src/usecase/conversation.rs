//! 会話サービス（履歴の更新・リモートモデル呼び出し・エラー分類）
//!
//! 送信前に user ターンを積み、失敗時は取り消す。応答の取り出しに失敗した場合は
//! 取り消さず、代わりの文言を assistant ターンとして積む。

use crate::domain::{ApiErrorKind, HistoryBuffer};
use crate::ports::inbound::Conversation;
use common::domain::ModelName;
use common::error::Error;
use common::llm::{GenerateRequest, GenerateResponse, LlmProvider, SafetySetting};
use common::msg::Role;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// 空白のみの入力に対する返答
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a message.";
/// 候補・パートが無い応答の代わりに使う文言
pub const NO_RESPONSE_MESSAGE: &str = "No response from Gemini.";
/// 応答の取り出しに失敗したときの文言
pub const EXTRACTION_ERROR_MESSAGE: &str = "Error processing AI response.";
/// reset の確認メッセージ
pub const RESET_CONFIRMATION: &str = "Chat history has been cleared.";

/// 毎回のリクエストに載せる固定設定
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSettings {
    pub model: ModelName,
    pub safety_settings: Vec<SafetySetting>,
}

/// 会話サービス
///
/// 1 セッションにつき 1 インスタンス。履歴バッファを所有し、他からは変更されない。
pub struct ConversationService {
    provider: Arc<dyn LlmProvider>,
    log: Arc<dyn Log>,
    settings: ConversationSettings,
    history: HistoryBuffer,
}

impl ConversationService {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        log: Arc<dyn Log>,
        settings: ConversationSettings,
        history: HistoryBuffer,
    ) -> Self {
        Self {
            provider,
            log,
            settings,
            history,
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    fn emit(&self, record: LogRecord) {
        let _ = self.log.log(&record.layer("usecase"));
    }

    fn append(&mut self, role: Role, text: &str) {
        let trimming = self.history.is_at_capacity();
        self.history.append(role, text);
        if trimming {
            self.emit(
                LogRecord::new(
                    LogLevel::Info,
                    format!("Trimmed chat history to {} turns", self.history.len()),
                )
                .kind("history")
                .field("max_pairs", self.history.max_pairs().get()),
            );
        }
    }

    /// プロバイダ呼び出し。パニックも通常のエラーとして扱う
    fn call_provider(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.provider.generate(request))) {
            Ok(result) => result,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(Error::system(format!(
                    "{} provider panicked: {}",
                    self.provider.name(),
                    detail
                )))
            }
        }
    }

    /// 応答テキストを取り出す。取り出せない場合も代わりの文言を返す（エラーにしない）
    fn extract_reply(&self, response: &GenerateResponse) -> String {
        match response.first_part_text() {
            Ok(Some(text)) => text,
            Ok(None) => {
                let mut record = LogRecord::new(
                    LogLevel::Warn,
                    format!("Unexpected response structure: {}", response.body()),
                )
                .kind("response");
                if let Some(reason) = response.stop_reason() {
                    record = record.field("stop_reason", reason);
                }
                self.emit(record);
                NO_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                self.emit(
                    LogRecord::new(LogLevel::Error, format!("Error extracting response text: {}", e))
                        .kind("response"),
                );
                EXTRACTION_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// API エラーを分類してログに残し、利用者向けメッセージを返す
    fn report_api_error(&self, error: &Error) -> String {
        let message = error.to_string();
        let kind = ApiErrorKind::classify(&message);
        match kind {
            ApiErrorKind::Unclassified => {
                self.emit(
                    LogRecord::new(LogLevel::Error, format!("API Error - {}", message))
                        .kind("api_error")
                        .field("category", kind.as_str()),
                );
                self.emit(
                    LogRecord::new(LogLevel::Debug, format!("{:?}", error)).kind("api_error"),
                );
            }
            _ => {
                self.emit(
                    LogRecord::new(LogLevel::Warn, message.clone())
                        .kind("api_error")
                        .field("category", kind.as_str()),
                );
            }
        }
        kind.user_message(&message)
    }
}

impl Conversation for ConversationService {
    /// 送信失敗時はユーザー発話だけを取り消す。
    ///
    /// 履歴が上限（2 * max_pairs ターン）に達していると、ユーザー発話を積む前に
    /// 最古のペアを捨てる。捨てたペアは失敗しても戻らないので、失敗後の履歴は
    /// 呼び出し前より 2 ターン短くなりうる（上限は常に守られる）。
    fn converse(&mut self, user_text: &str) -> String {
        if user_text.trim().is_empty() {
            return EMPTY_INPUT_MESSAGE.to_string();
        }

        self.append(Role::User, user_text);

        let request = GenerateRequest {
            model: self.settings.model.clone(),
            contents: self.history.snapshot(),
            safety_settings: self.settings.safety_settings.clone(),
        };

        match self.call_provider(&request) {
            Ok(response) => {
                let reply = self.extract_reply(&response);
                self.append(Role::Assistant, &reply);
                reply
            }
            Err(e) => {
                self.history.remove_last_if_user();
                self.report_api_error(&e)
            }
        }
    }

    fn reset(&mut self) -> String {
        self.history.clear();
        self.emit(LogRecord::new(LogLevel::Info, "Chat history cleared").kind("history"));
        RESET_CONFIRMATION.to_string()
    }
}
