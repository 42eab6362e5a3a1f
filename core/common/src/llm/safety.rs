//! コンテンツモデレーション設定（カテゴリ → ブロック閾値）

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// モデレーション対象カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    /// 設定で扱う全カテゴリ（リクエストに載せる順）
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];

    /// API 上の名前
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Harassment => "HARM_CATEGORY_HARASSMENT",
            Self::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            Self::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            Self::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
        }
    }

    /// 設定キー・環境変数の接尾辞に使う短い名前（harassment 等）
    pub fn key(&self) -> &'static str {
        match self {
            Self::Harassment => "harassment",
            Self::HateSpeech => "hate_speech",
            Self::SexuallyExplicit => "sexually_explicit",
            Self::DangerousContent => "dangerous_content",
        }
    }

    /// 短い名前・API 名のどちらからでも解決する（大文字小文字は区別しない）
    pub fn from_key(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let short = lower.strip_prefix("harm_category_").unwrap_or(&lower);
        Self::ALL.into_iter().find(|c| c.key() == short)
    }
}

/// ブロック閾値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl HarmBlockThreshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockNone => "BLOCK_NONE",
            Self::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            Self::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            Self::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
        }
    }
}

impl FromStr for HarmBlockThreshold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOCK_NONE" => Ok(Self::BlockNone),
            "BLOCK_ONLY_HIGH" => Ok(Self::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" => Ok(Self::BlockMediumAndAbove),
            "BLOCK_LOW_AND_ABOVE" => Ok(Self::BlockLowAndAbove),
            _ => Err(Error::config(format!(
                "Unknown safety threshold '{}' (expected BLOCK_NONE, BLOCK_ONLY_HIGH, BLOCK_MEDIUM_AND_ABOVE or BLOCK_LOW_AND_ABOVE)",
                s
            ))),
        }
    }
}

/// 1 カテゴリ分のモデレーション設定（リクエストの safetySettings 要素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self { category, threshold }
    }

    /// 全カテゴリを BLOCK_MEDIUM_AND_ABOVE にした既定値
    pub fn defaults() -> Vec<SafetySetting> {
        HarmCategory::ALL
            .into_iter()
            .map(|c| SafetySetting::new(c, HarmBlockThreshold::BlockMediumAndAbove))
            .collect()
    }
}
