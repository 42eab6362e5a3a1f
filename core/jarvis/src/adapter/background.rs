//! ウィンドウ型の表示面向け: 会話コアをワーカースレッドで呼び出すハンドル
//!
//! 応答待ちの間は新しい送信と reset を受け付けない（処理中フラグ）。
//! フラグは on_reply が戻った後（パニックした場合も）に下ろす。

use crate::ports::inbound::Conversation;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

/// submit / reset を受け付けられなかった理由
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a request is already in flight")]
    Busy,
    #[error("failed to start worker thread: {0}")]
    Spawn(String),
}

/// 処理中フラグを drop で下ろす
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 会話コアのバックグラウンド実行ハンドル
pub struct BackgroundSession<C: Conversation + 'static> {
    conversation: Arc<Mutex<C>>,
    busy: Arc<AtomicBool>,
}

impl<C: Conversation + 'static> BackgroundSession<C> {
    pub fn new(conversation: C) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(conversation)),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn try_acquire(&self) -> Result<BusyGuard, SubmitError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| BusyGuard(Arc::clone(&self.busy)))
            .map_err(|_| SubmitError::Busy)
    }

    fn lock(conversation: &Mutex<C>) -> MutexGuard<'_, C> {
        match conversation.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// メッセージをワーカースレッドで送る。応答は同じスレッドで on_reply に渡す
    pub fn submit<F>(&self, text: impl Into<String>, on_reply: F) -> Result<JoinHandle<()>, SubmitError>
    where
        F: FnOnce(String) + Send + 'static,
    {
        let guard = self.try_acquire()?;
        let conversation = Arc::clone(&self.conversation);
        let text = text.into();
        thread::Builder::new()
            .name("jarvis-converse".to_string())
            .spawn(move || {
                let _guard = guard;
                let reply = Self::lock(&conversation).converse(&text);
                on_reply(reply);
            })
            .map_err(|e| SubmitError::Spawn(e.to_string()))
    }

    /// 履歴を消して確認メッセージを返す。応答待ちの間は Busy
    pub fn reset(&self) -> Result<String, SubmitError> {
        let _guard = self.try_acquire()?;
        Ok(Self::lock(&self.conversation).reset())
    }
}
