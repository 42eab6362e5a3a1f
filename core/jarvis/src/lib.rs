//! jarvis: Gemini を使う対話アシスタント
//!
//! 会話コア（履歴バッファ・会話サービス）と、その表示面（行単位の対話ループ、
//! ウィンドウ型表示面向けのバックグラウンド実行ハンドル）を提供する。

pub mod adapter;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod usecase;
pub mod wiring;

#[cfg(test)]
mod tests;

use adapter::install_interrupt_handler;
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome, USAGE};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::JarvisCommand;
use ports::inbound::{Conversation, UseCaseRunner};
use wiring::{wire_jarvis, App};

/// JarvisCommand をディスパッチする Runner（match はここに集約）
pub struct Runner {
    pub app: App,
}

fn cmd_name_for_log(cmd: &JarvisCommand) -> &'static str {
    match cmd {
        JarvisCommand::Help => "help",
        JarvisCommand::Chat => "chat",
        JarvisCommand::Ask { .. } => "ask",
    }
}

impl UseCaseRunner for Runner {
    fn run(&mut self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(&config);
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = match cmd {
            JarvisCommand::Help => {
                print_help();
                Ok(0)
            }
            JarvisCommand::Chat => {
                if let Err(e) = install_interrupt_handler(self.app.logger.clone()) {
                    let _ = self.app.logger.log(
                        &LogRecord::new(LogLevel::Warn, e.to_string())
                            .layer("cli")
                            .kind("lifecycle"),
                    );
                }
                self.app.chat_loop.run(&mut self.app.conversation)
            }
            JarvisCommand::Ask { message } => {
                let reply = self.app.conversation.converse(&message);
                self.app.console.print_line(&reply).map(|_| 0)
            }
        };

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self
                .app
                .logger
                .log(&LogRecord::new(LogLevel::Error, e.to_string()).layer("cli").kind("error"));
        }
        result
    }
}

pub fn print_usage() {
    eprintln!("{}", USAGE);
}

pub fn print_help() {
    println!("{}", USAGE);
    println!("  -h, --help            Display this help message.");
    println!("  -v, --verbose         Also print structured logs to stderr.");
    println!("  -m, --model <model>   Model name (default: gemini-2.5-flash).");
    println!("  --max-pairs <n>       Number of user/assistant exchanges kept as context (default: 20).");
    println!("  --save-dir <dir>      Directory for /save transcripts (default: current directory).");
    println!("  --generate <shell>    Generate shell completion script (bash, zsh, fish, ...).");
    println!("  [message...]          Send one message, print the reply and exit. Omit for interactive chat.");
    println!();
    println!("Environment:");
    println!("  GEMINI_API_KEY        API key for the Gemini API (required; may be set in .env).");
    println!("  JARVIS_HOME           Home directory (config.json, log/). Default: $XDG_CONFIG_HOME/jarvis or ~/.config/jarvis.");
    println!("  JARVIS_MODEL          Model name.");
    println!("  JARVIS_MAX_PAIRS      Number of exchanges kept as context.");
    println!("  JARVIS_SAFETY_<CATEGORY>  Block threshold for HARASSMENT, HATE_SPEECH, SEXUALLY_EXPLICIT, DANGEROUS_CONTENT.");
    println!("  JARVIS_BASE_URL       API base URL (default: https://generativelanguage.googleapis.com/v1beta).");
    println!();
    println!("Chat commands:");
    for (cmd, desc) in domain::COMMANDS {
        println!("  {:<10} - {}", cmd, desc);
    }
}

/// 引数を解析して実行し、終了コードを返す
pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    // ヘルプは設定（API キー）なしで表示できる
    if config_to_command(&config) == JarvisCommand::Help {
        print_help();
        return Ok(0);
    }
    let app = wire_jarvis(&config)?;
    let mut runner = Runner { app };
    runner.run(config)
}
