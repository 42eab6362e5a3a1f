use crate::domain::JarvisCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

pub const USAGE: &str =
    "Usage: jarvis [-h] [-v] [-m|--model model] [--max-pairs n] [--save-dir directory] [message...]";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: 構造化ログを stderr にも出す
    pub verbose: bool,
    pub model: Option<String>,
    pub max_pairs: Option<usize>,
    /// /save の保存先（未指定ならカレントディレクトリ）
    pub save_dir: Option<PathBuf>,
    /// 単発モードのメッセージ（空なら対話ループ）
    pub message_args: Vec<String>,
}

/// 解析結果: 通常の Config または補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("jarvis")
        .about("Chat with Jarvis, a conversational assistant backed by Gemini")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also print structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Model name (default: gemini-2.5-flash)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-pairs")
                .long("max-pairs")
                .value_name("n")
                .help("Number of user/assistant exchanges to keep as context")
                .value_parser(value_parser!(u64).range(1..))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("save-dir")
                .long("save-dir")
                .value_name("directory")
                .help("Directory for /save transcripts (default: current directory)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("message")
                .index(1)
                .help("Send one message and print the reply (omit for interactive chat)")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        model: matches.get_one::<String>("model").cloned(),
        max_pairs: matches
            .get_one::<u64>("max-pairs")
            .map(|&n| usize::try_from(n).unwrap_or(usize::MAX)),
        save_dir: matches.get_one::<PathBuf>("save-dir").cloned(),
        message_args: matches
            .get_many::<String>("message")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "jarvis", &mut std::io::stdout());
}

/// Config を JarvisCommand に変換する
pub fn config_to_command(config: &Config) -> JarvisCommand {
    if config.help {
        return JarvisCommand::Help;
    }
    if config.message_args.is_empty() {
        return JarvisCommand::Chat;
    }
    JarvisCommand::Ask {
        message: config.message_args.join(" "),
    }
}
