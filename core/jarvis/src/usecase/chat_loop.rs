//! 行単位の対話ループ（CLI 表示面）
//!
//! コンソール・保存先・時計は Outbound ポート経由。会話コアには Conversation だけで触れる。
//! 表示した行は保存用の会話ログにも積む（コマンド行は積まない）。

use crate::domain::{ChatCommand, COMMANDS};
use crate::ports::inbound::Conversation;
use crate::ports::outbound::{Console, TranscriptStore};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::sync::Arc;

pub const ASSISTANT_NAME: &str = "Jarvis";
pub const WELCOME_MESSAGE: &str = "Hi, I am Jarvis. How may I help you?";
pub const FAREWELL_MESSAGE: &str = "Goodbye!";
pub const USER_PROMPT: &str = "User: ";

fn separator() -> String {
    "=".repeat(50)
}

/// 対話ループの依存
pub struct ChatLoopDeps {
    pub console: Arc<dyn Console>,
    pub transcripts: Arc<dyn TranscriptStore>,
    pub clock: Arc<dyn Clock>,
    pub log: Arc<dyn Log>,
}

/// 行単位の対話ループ
pub struct ChatLoop {
    deps: ChatLoopDeps,
}

impl ChatLoop {
    pub fn new(deps: ChatLoopDeps) -> Self {
        Self { deps }
    }

    fn print(&self, line: &str) -> Result<(), Error> {
        self.deps.console.print_line(line)
    }

    /// "[HH:MM:SS] Jarvis: ..." を表示し、その行を返す
    fn print_with_timestamp(&self, message: &str) -> Result<String, Error> {
        let timestamp = self.deps.clock.now().format("%H:%M:%S");
        let line = format!("[{}] {}: {}", timestamp, ASSISTANT_NAME, message);
        self.print(&line)?;
        Ok(line)
    }

    /// タイムスタンプなしの "Jarvis: ..." 行
    fn say(&self, message: &str) -> Result<String, Error> {
        let line = format!("{}: {}", ASSISTANT_NAME, message);
        self.print(&line)?;
        Ok(line)
    }

    fn print_help(&self) -> Result<(), Error> {
        self.print("")?;
        self.print(&separator())?;
        self.print("Available commands:")?;
        for (cmd, desc) in COMMANDS {
            self.print(&format!("  {:<10} - {}", cmd, desc))?;
        }
        self.print(&separator())?;
        self.print("")
    }

    fn save(&self, chat_log: &[String]) -> Result<(), Error> {
        match self.deps.transcripts.save(chat_log, self.deps.clock.now()) {
            Ok(name) => {
                self.say(&format!("Chat history saved to {}", name))?;
            }
            Err(e) => {
                let _ = self.deps.log.log(
                    &LogRecord::new(
                        LogLevel::Error,
                        format!("Error saving chat history - {}", e),
                    )
                    .layer("usecase")
                    .kind("file_error"),
                );
                self.say(&format!("Failed to save chat history: {}", e))?;
            }
        }
        Ok(())
    }

    /// 入力終端か終了コマンドまで対話する。終了コードを返す
    pub fn run(&self, conversation: &mut dyn Conversation) -> Result<i32, Error> {
        let mut chat_log: Vec<String> = Vec::new();

        self.print("")?;
        self.print(&separator())?;
        self.print("Welcome to Jarvis AI Assistant (Command Line Interface)")?;
        self.print(&separator())?;
        chat_log.push(self.print_with_timestamp(WELCOME_MESSAGE)?);
        self.print("Type /help to see available commands.")?;
        self.print("")?;

        loop {
            let line = match self.deps.console.read_line(USER_PROMPT)? {
                Some(line) => line,
                None => {
                    self.say(FAREWELL_MESSAGE)?;
                    break;
                }
            };
            let Some(command) = ChatCommand::parse(&line) else {
                continue;
            };
            // コマンド行も含め、空でない入力はすべて記録に残す
            chat_log.push(format!("User: {}", line));
            match command {
                ChatCommand::Exit => {
                    chat_log.push(self.say(FAREWELL_MESSAGE)?);
                    break;
                }
                ChatCommand::Help => self.print_help()?,
                ChatCommand::Clear => {
                    let message = conversation.reset();
                    self.say(&message)?;
                    chat_log.clear();
                }
                ChatCommand::Save => self.save(&chat_log)?,
                ChatCommand::Message(text) => {
                    let reply = conversation.converse(&text);
                    chat_log.push(self.print_with_timestamp(&reply)?);
                }
            }
        }

        Ok(0)
    }
}
