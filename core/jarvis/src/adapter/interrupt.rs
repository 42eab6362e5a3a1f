//! Ctrl+C（SIGINT）で対話を終了するハンドラ
//!
//! 案内を表示してログに残し、終了コード 0 で抜ける。

use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub const INTERRUPT_MESSAGE: &str = "Jarvis: Interrupted. Goodbye!";

/// SIGINT ハンドラを登録する。プロセスにつき 1 回だけ登録できる（ctrlc の仕様）
pub fn install_interrupt_handler(log: Arc<dyn Log>) -> Result<(), Error> {
    ctrlc::set_handler(move || {
        println!("\n{}", INTERRUPT_MESSAGE);
        let _ = log.log(
            &LogRecord::new(LogLevel::Info, "interrupted by user")
                .layer("adapter")
                .kind("lifecycle"),
        );
        std::process::exit(0);
    })
    .map_err(|e| Error::system(format!("failed to install Ctrl+C handler: {}", e)))
}
