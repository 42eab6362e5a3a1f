//! Ports & Adapters のポート定義
//!
//! - inbound: 表示面（CLI・ウィンドウ）が会話コアを呼び出すインターフェース
//! - outbound: 会話コア・対話ループが外界（コンソール・保存先）を使うための trait

pub mod inbound;
pub mod outbound;
