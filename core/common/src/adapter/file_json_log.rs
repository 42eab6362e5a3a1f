//! 構造化ログの出力先（JSONL ファイル・破棄・メモリ）
//!
//! 1 レコード = 1 行。書き込みのたびに開いて追記し、閉じる。

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// <home>/log/jarvis.jsonl などへ追記する Log 実装
pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    target: PathBuf,
}

impl FileJsonLog {
    /// ディレクトリは最初の書き込み時に作る
    pub fn new(fs: Arc<dyn FileSystem>, target: impl AsRef<Path>) -> Self {
        let target = target.as_ref().to_path_buf();
        Self { fs, target }
    }

    fn encode(record: &LogRecord) -> Result<Vec<u8>, Error> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let line = Self::encode(record)?;
        if let Some(dir) = self.target.parent() {
            if !self.fs.exists(dir) {
                self.fs.create_dir_all(dir)?;
            }
        }
        let mut out = self.fs.open_append(&self.target)?;
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }
}

/// 捨てるだけの Log（ログ先が決まらないときの代替）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}

/// レコードを溜めておく Log（テストで内容を確かめる用）
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Log for MemoryLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records
            .lock()
            .map_err(|_| Error::system("log buffer poisoned"))?
            .push(record.clone());
        Ok(())
    }
}
