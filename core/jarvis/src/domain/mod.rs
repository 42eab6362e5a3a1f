//! jarvis 固有のドメイン型（型と不変条件）

pub mod api_error;
pub mod chat_command;
pub mod command;
pub mod history;

pub use api_error::ApiErrorKind;
pub use chat_command::{ChatCommand, COMMANDS};
pub use command::JarvisCommand;
pub use history::{HistoryBuffer, MaxPairs};
