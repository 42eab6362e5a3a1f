//! 環境変数解決 Outbound ポート
//!
//! 設定値・ホームディレクトリを環境変数から解決する。
//! usecase・設定ローダーはこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のマップなど。
pub trait EnvResolver: Send + Sync {
    /// 環境変数を読む（未設定・空文字は None）
    fn var(&self, name: &str) -> Option<String>;

    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. JARVIS_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/jarvis（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/jarvis
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = self.var("JARVIS_HOME") {
            return Ok(HomeDir::new(home));
        }
        let config_base = self
            .var("XDG_CONFIG_HOME")
            .map(std::path::PathBuf::from)
            .or_else(|| {
                self.var("HOME")
                    .map(|h| std::path::PathBuf::from(h).join(".config"))
            })
            .ok_or_else(|| Error::env("HOME is not set"))?;
        Ok(HomeDir::new(config_base.join("jarvis")))
    }
}
