//! 会話履歴バッファのドメイン型
//!
//! user/assistant のターン列を時系列順に保持し、リモートモデルへ毎回そのまま渡す。
//! 長さはペア数（user + assistant）で上限を持ち、超える分は先頭から 2 ターンずつ捨てる。

use common::error::Error;
use common::msg::{Role, Turn};
use std::collections::VecDeque;

/// 保持するペア数の上限（1 以上）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPairs(usize);

impl MaxPairs {
    pub const DEFAULT: MaxPairs = MaxPairs(20);

    pub fn new(n: usize) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::config("max_pairs must be at least 1"));
        }
        Ok(Self(n))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// ターン数に換算した上限
    pub fn turn_capacity(&self) -> usize {
        self.0 * 2
    }
}

impl Default for MaxPairs {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 会話履歴バッファ
///
/// 不変条件: ターン数は常に `2 * max_pairs` 以下。追加と末尾 user の取り消し以外で順序は変わらない。
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    turns: VecDeque<Turn>,
    max_pairs: MaxPairs,
}

impl HistoryBuffer {
    pub fn new(max_pairs: MaxPairs) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_pairs.turn_capacity()),
            max_pairs,
        }
    }

    /// 末尾にターンを追加する。上限に達していれば先に最古のペアを捨てる
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        if self.is_at_capacity() {
            self.turns.drain(..2);
        }
        self.turns.push_back(Turn::new(role, text));
    }

    /// 末尾が user のときだけ取り除いて返す。空・末尾 assistant なら何もしない
    pub fn remove_last_if_user(&mut self) -> Option<Turn> {
        match self.turns.back() {
            Some(turn) if turn.role() == Role::User => self.turns.pop_back(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// 現在のターン列のコピー（送信リクエストの組み立て用）
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// 次の append で最古のペアが捨てられるか
    pub fn is_at_capacity(&self) -> bool {
        self.turns.len() >= self.max_pairs.turn_capacity()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_pairs(&self) -> MaxPairs {
        self.max_pairs
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(MaxPairs::default())
    }
}
