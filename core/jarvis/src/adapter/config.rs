//! 起動時設定の読み込み（adapter 層）
//!
//! 優先順位（低 → 高）: 既定値 → <home>/config.json → 環境変数 → CLI フラグ。
//! 読み込みは起動時の 1 回だけ。以後は読み取り専用。

use crate::domain::MaxPairs;
use common::domain::{ApiKey, HomeDir, ModelName};
use common::error::Error;
use common::llm::{HarmBlockThreshold, HarmCategory, SafetySetting};
use common::ports::outbound::{EnvResolver, FileSystem};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// config.json の中身（キーはすべて省略可）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    model: Option<String>,
    max_pairs: Option<usize>,
    base_url: Option<String>,
    /// カテゴリ名 → 閾値
    safety: BTreeMap<String, String>,
}

/// CLI フラグからの上書き
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub max_pairs: Option<usize>,
}

/// 解決済みの設定
#[derive(Debug, Clone)]
pub struct JarvisConfig {
    pub api_key: ApiKey,
    pub model: ModelName,
    pub max_pairs: MaxPairs,
    pub safety_settings: Vec<SafetySetting>,
    /// API のベース URL（未指定なら公式エンドポイント）
    pub base_url: Option<String>,
}

fn read_config_file(fs: &dyn FileSystem, home: Option<&HomeDir>) -> Result<ConfigFile, Error> {
    let Some(home) = home else {
        return Ok(ConfigFile::default());
    };
    let path = home.config_file();
    if !fs.exists(&path) {
        return Ok(ConfigFile::default());
    }
    let content = fs.read_to_string(&path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))
}

fn parse_max_pairs(raw: &str, source: &str) -> Result<MaxPairs, Error> {
    let n = raw.trim().parse::<usize>().map_err(|_| {
        Error::config(format!("{} must be a positive integer (got '{}')", source, raw))
    })?;
    MaxPairs::new(n)
}

fn env_var_for(category: HarmCategory) -> String {
    format!("JARVIS_SAFETY_{}", category.key().to_ascii_uppercase())
}

/// モデレーション設定を組み立てる。カテゴリの並びは HarmCategory::ALL の順
fn resolve_safety(
    file: &BTreeMap<String, String>,
    env: &dyn EnvResolver,
) -> Result<Vec<SafetySetting>, Error> {
    let mut thresholds: BTreeMap<&'static str, HarmBlockThreshold> = HarmCategory::ALL
        .into_iter()
        .map(|c| (c.key(), HarmBlockThreshold::BlockMediumAndAbove))
        .collect();

    for (name, value) in file {
        let category = HarmCategory::from_key(name)
            .ok_or_else(|| Error::config(format!("Unknown safety category '{}'", name)))?;
        thresholds.insert(category.key(), value.parse()?);
    }
    for category in HarmCategory::ALL {
        if let Some(value) = env.var(&env_var_for(category)) {
            thresholds.insert(category.key(), value.parse()?);
        }
    }

    Ok(HarmCategory::ALL
        .into_iter()
        .map(|c| {
            let threshold = thresholds
                .get(c.key())
                .copied()
                .unwrap_or(HarmBlockThreshold::BlockMediumAndAbove);
            SafetySetting::new(c, threshold)
        })
        .collect())
}

/// 設定を読み込む。資格情報が無い・値が不正な場合は起動エラー
///
/// `home` が None のときは設定ファイルを飛ばし、既定値・環境変数・CLI だけで解決する。
pub fn load_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
    home: Option<&HomeDir>,
    overrides: &ConfigOverrides,
) -> Result<JarvisConfig, Error> {
    let file = read_config_file(fs, home)?;

    let api_key = env
        .var(API_KEY_VAR)
        .and_then(|v| ApiKey::parse(&v))
        .ok_or_else(|| {
            Error::env(format!(
                "Missing API key. Please set {} in your environment or .env file",
                API_KEY_VAR
            ))
        })?;

    let model = overrides
        .model
        .clone()
        .or_else(|| env.var("JARVIS_MODEL"))
        .or(file.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(Error::config("model must not be empty"));
    }

    let max_pairs = match (overrides.max_pairs, env.var("JARVIS_MAX_PAIRS"), file.max_pairs) {
        (Some(n), _, _) => MaxPairs::new(n)?,
        (None, Some(raw), _) => parse_max_pairs(&raw, "JARVIS_MAX_PAIRS")?,
        (None, None, Some(n)) => MaxPairs::new(n)?,
        (None, None, None) => MaxPairs::default(),
    };

    let safety_settings = resolve_safety(&file.safety, env)?;
    let base_url = env.var("JARVIS_BASE_URL").or(file.base_url);

    Ok(JarvisConfig {
        api_key,
        model: ModelName::new(model.trim()),
        max_pairs,
        safety_settings,
        base_url,
    })
}
