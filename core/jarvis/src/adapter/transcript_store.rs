//! 会話ログをテキストファイルに保存する TranscriptStore 実装

use crate::ports::outbound::TranscriptStore;
use chrono::{DateTime, Local};
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;

/// `chat_history_YYYYmmdd_HHMMSS.txt` を保存先ディレクトリへ書く
pub struct FileTranscriptStore {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
}

impl FileTranscriptStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    pub fn file_name(now: DateTime<Local>) -> String {
        format!("chat_history_{}.txt", now.format("%Y%m%d_%H%M%S"))
    }
}

impl TranscriptStore for FileTranscriptStore {
    fn save(&self, lines: &[String], now: DateTime<Local>) -> Result<String, Error> {
        let name = Self::file_name(now);
        if !self.dir.as_os_str().is_empty() && !self.fs.exists(&self.dir) {
            self.fs.create_dir_all(&self.dir)?;
        }
        self.fs.write(&self.dir.join(&name), &lines.join("\n"))?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::adapter::StdFileSystem;
    use tempfile::tempdir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            FileTranscriptStore::file_name(fixed_time()),
            "chat_history_20260304_050607.txt"
        );
    }

    #[test]
    fn test_save_writes_lines() {
        let dir = tempdir().unwrap();
        let store = FileTranscriptStore::new(Arc::new(StdFileSystem), dir.path().join("saved"));
        let lines = vec!["User: hi".to_string(), "[05:06:07] Jarvis: hello".to_string()];
        let name = store.save(&lines, fixed_time()).unwrap();
        let content = std::fs::read_to_string(dir.path().join("saved").join(&name)).unwrap();
        assert_eq!(content, "User: hi\n[05:06:07] Jarvis: hello");
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileTranscriptStore::new(Arc::new(StdFileSystem), blocker.join("sub"));
        assert!(store.save(&["a".to_string()], fixed_time()).is_err());
    }
}
