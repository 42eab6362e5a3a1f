//! シナリオテスト（スタブのプロバイダ・コンソール・時計で組み立てる）

mod conversation_tests;

use crate::domain::{HistoryBuffer, MaxPairs};
use crate::ports::outbound::Console;
use crate::usecase::{ConversationService, ConversationSettings};
use chrono::{DateTime, Local, TimeZone};
use common::domain::ModelName;
use common::error::Error;
use common::llm::{LlmProvider, SafetySetting};
use common::ports::outbound::{Clock, Log};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 入力行を台本どおりに返し、出力行を溜める Console
pub(crate) struct ScriptedConsole {
    input: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub(crate) fn new(lines: &[&str]) -> Self {
        Self {
            input: Mutex::new(lines.iter().map(|s| s.to_string()).collect()),
            output: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&self, _prompt: &str) -> Result<Option<String>, Error> {
        Ok(self.input.lock().unwrap().pop_front())
    }

    fn print_line(&self, line: &str) -> Result<(), Error> {
        self.output.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// 常に同じ時刻を返す Clock
pub(crate) struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub(crate) fn at(h: u32, m: u32, s: u32) -> Self {
        Self(Local.with_ymd_and_hms(2026, 1, 2, h, m, s).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

pub(crate) fn settings() -> ConversationSettings {
    ConversationSettings {
        model: ModelName::new("gemini-2.5-flash"),
        safety_settings: SafetySetting::defaults(),
    }
}

pub(crate) fn service(
    provider: Arc<dyn LlmProvider>,
    log: Arc<dyn Log>,
    max_pairs: usize,
) -> ConversationService {
    ConversationService::new(
        provider,
        log,
        settings(),
        HistoryBuffer::new(MaxPairs::new(max_pairs).unwrap()),
    )
}
