//! LLMプロバイダの実装
//!
//! 会話サービスは LlmProvider trait だけに依存し、Gemini などの具体実装は wiring で注入する。

pub mod gemini;
pub mod provider;
pub mod safety;

pub use gemini::GeminiProvider;
pub use provider::{GenerateRequest, GenerateResponse, LlmProvider};
pub use safety::{HarmBlockThreshold, HarmCategory, SafetySetting};
