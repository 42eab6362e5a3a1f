//! 人間向けログ（LogRecord → stderr へ要点のみ出力）と複数出力先への分配
//!
//! fields の全量は出さず要点のみ（巨大化防止）。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

const FIELDS_SUMMARY_MAX: usize = 400;

/// fields の要点だけを短い文字列にする（巨大化防止）
fn fields_summary(record: &LogRecord) -> Option<String> {
    let fields = record.fields.as_ref()?;
    if fields.is_empty() {
        return None;
    }
    let s = serde_json::to_string(fields).ok()?;
    if s.chars().count() <= FIELDS_SUMMARY_MAX {
        return Some(s);
    }
    let truncated = s.chars().take(FIELDS_SUMMARY_MAX).collect::<String>();
    Some(format!("{}... (len={})", truncated, s.len()))
}

/// 1 レコードを 1 行に整形する
pub fn format_human(record: &LogRecord) -> String {
    let mut line = format!("[{}] {}", record.level.as_str(), record.message);
    if let Some(kind) = &record.kind {
        line = format!("{} ({})", line, kind);
    }
    if let Some(summary) = fields_summary(record) {
        line = format!("{} {}", line, summary);
    }
    line
}

/// 人間向けログ（-v/--verbose 時に stderr へ出す）
pub struct StderrLog {
    min_level: LogLevel,
}

impl StderrLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

fn severity(level: LogLevel) -> u8 {
    match level {
        LogLevel::Error => 3,
        LogLevel::Warn => 2,
        LogLevel::Info => 1,
        LogLevel::Debug => 0,
    }
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if severity(record.level) >= severity(self.min_level) {
            eprintln!("{}", format_human(record));
        }
        Ok(())
    }
}

/// 複数の Log へ同じレコードを流す。1 つが失敗しても残りには書く
pub struct TeeLog {
    sinks: Vec<Arc<dyn Log>>,
}

impl TeeLog {
    pub fn new(sinks: Vec<Arc<dyn Log>>) -> Self {
        Self { sinks }
    }
}

impl Log for TeeLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.log(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryLog;

    struct FailingLog;

    impl Log for FailingLog {
        fn log(&self, _record: &LogRecord) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn test_format_human() {
        let rec = LogRecord::new(LogLevel::Warn, "quota").kind("api_error").field("category", "quota");
        assert_eq!(format_human(&rec), r#"[warn] quota (api_error) {"category":"quota"}"#);
    }

    #[test]
    fn test_format_human_truncates_large_fields() {
        let rec = LogRecord::new(LogLevel::Debug, "big").field("body", "x".repeat(1000));
        let line = format_human(&rec);
        assert!(line.contains("... (len="));
    }

    #[test]
    fn test_tee_log_writes_all_and_reports_error() {
        let mem = Arc::new(MemoryLog::new());
        let sinks: Vec<Arc<dyn Log>> = vec![Arc::new(FailingLog), mem.clone()];
        let tee = TeeLog::new(sinks);
        let result = tee.log(&LogRecord::new(LogLevel::Info, "hello"));
        assert!(result.is_err());
        assert_eq!(mem.records().len(), 1);
    }
}
