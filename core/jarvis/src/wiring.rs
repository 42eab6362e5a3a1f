//! 配線: 標準アダプタで会話サービスと対話ループを組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem, StderrLog, TeeLog};
use common::error::Error;
use common::llm::{GeminiProvider, LlmProvider};
use common::ports::outbound::{Clock, EnvResolver, FileSystem, Log, LogLevel, LogRecord};

use crate::adapter::{load_config, ConfigOverrides, FileTranscriptStore, JarvisConfig, StdConsole};
use crate::cli::Config;
use crate::domain::HistoryBuffer;
use crate::ports::outbound::{Console, TranscriptStore};
use crate::usecase::{ChatLoop, ChatLoopDeps, ConversationService, ConversationSettings};

/// 配線で組み立てた部品（Runner のディスパッチで利用）
pub struct App {
    pub logger: Arc<dyn Log>,
    pub console: Arc<dyn Console>,
    pub conversation: ConversationService,
    pub chat_loop: ChatLoop,
}

/// 構造化ログ: ファイルへ JSONL。-v のときは stderr にも出す
fn wire_logger(fs: &Arc<dyn FileSystem>, env: &dyn EnvResolver, verbose: bool) -> Arc<dyn Log> {
    let file_log: Arc<dyn Log> = env
        .resolve_home_dir()
        .map(|home| Arc::new(FileJsonLog::new(Arc::clone(fs), home.log_file())) as Arc<dyn Log>)
        .unwrap_or_else(|_| Arc::new(NoopLog));
    if verbose {
        let stderr_log: Arc<dyn Log> = Arc::new(StderrLog::new(LogLevel::Debug));
        Arc::new(TeeLog::new(vec![file_log, stderr_log]))
    } else {
        file_log
    }
}

/// 設定を解決する。ホームが決まらなければ設定ファイルなしで続ける（warn を残す）
pub(crate) fn load_settings(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
    logger: &dyn Log,
    config: &Config,
) -> Result<JarvisConfig, Error> {
    let home = match env.resolve_home_dir() {
        Ok(home) => Some(home),
        Err(e) => {
            let _ = logger.log(
                &LogRecord::new(
                    LogLevel::Warn,
                    format!("home directory unavailable, config file skipped: {}", e),
                )
                .layer("wiring")
                .kind("config"),
            );
            None
        }
    };
    load_config(fs, env, home.as_ref(), &overrides_from(config))
}

fn wire_provider(settings: &JarvisConfig) -> Result<Arc<dyn LlmProvider>, Error> {
    let provider = match &settings.base_url {
        Some(url) => GeminiProvider::with_base_url(settings.api_key.clone(), url.as_str())?,
        None => GeminiProvider::new(settings.api_key.clone())?,
    };
    Ok(Arc::new(provider))
}

fn overrides_from(config: &Config) -> ConfigOverrides {
    ConfigOverrides {
        model: config.model.clone(),
        max_pairs: config.max_pairs,
    }
}

/// 解決済み設定と注入された部品から App を組み立てる（テストからも使う）
pub fn assemble(
    settings: &JarvisConfig,
    provider: Arc<dyn LlmProvider>,
    console: Arc<dyn Console>,
    transcripts: Arc<dyn TranscriptStore>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Log>,
) -> App {
    let conversation = ConversationService::new(
        provider,
        Arc::clone(&logger),
        ConversationSettings {
            model: settings.model.clone(),
            safety_settings: settings.safety_settings.clone(),
        },
        HistoryBuffer::new(settings.max_pairs),
    );
    let chat_loop = ChatLoop::new(ChatLoopDeps {
        console: Arc::clone(&console),
        transcripts,
        clock,
        log: Arc::clone(&logger),
    });
    App {
        logger,
        console,
        conversation,
        chat_loop,
    }
}

/// 配線: 標準アダプタで App を組み立てる。設定の不備は起動エラー
pub fn wire_jarvis(config: &Config) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env = StdEnvResolver;
    let logger = wire_logger(&fs, &env, config.verbose);

    let loaded = load_settings(fs.as_ref(), &env, logger.as_ref(), config)
        .and_then(|settings| wire_provider(&settings).map(|provider| (provider, settings)));
    let (provider, settings) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            let _ = logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("wiring")
                    .kind("config"),
            );
            return Err(e);
        }
    };

    let save_dir = config.save_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let transcripts: Arc<dyn TranscriptStore> =
        Arc::new(FileTranscriptStore::new(Arc::clone(&fs), save_dir));

    let _ = logger.log(
        &LogRecord::new(LogLevel::Debug, "configuration loaded")
            .layer("wiring")
            .kind("config")
            .field("model", &*settings.model)
            .field("max_pairs", settings.max_pairs.get())
            .field("provider", provider.name()),
    );

    Ok(assemble(
        &settings,
        provider,
        Arc::new(StdConsole),
        transcripts,
        Arc::new(StdClock),
        logger,
    ))
}
