//! アダプター（jarvis 固有の Outbound ポート実装と起動時の設定読み込み）

pub mod background;
pub mod config;
pub mod console;
pub mod interrupt;
pub mod stub_llm;
pub mod transcript_store;

pub use background::{BackgroundSession, SubmitError};
pub use config::{load_config, ConfigOverrides, JarvisConfig};
pub use console::StdConsole;
pub use interrupt::install_interrupt_handler;
#[cfg(test)]
pub use stub_llm::{Scripted, StubLlm};
pub use transcript_store::FileTranscriptStore;
