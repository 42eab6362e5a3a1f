//! ファイル操作 Outbound ポート（設定ファイル・ログ・会話ログの保存）

use crate::error::Error;
use std::io::Write;
use std::path::Path;

/// ファイル操作の抽象。標準実装は `common::adapter::StdFileSystem`
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    /// 丸ごと書き込む（既存の内容は置き換える）
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    /// 末尾追記で開く。無ければ作る
    fn open_append(&self, path: &Path) -> Result<Box<dyn Write + Send>, Error>;
}
