//! ドメインエンティティ定義

use super::value_object::{MessageContent, Nick, Timestamp};

/// チャットメッセージ
///
/// 受信時に正規化された不変レコード。`timestamp` は受信時にサーバ側で
/// 割り当てられます。
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// 送信者の表示名（メッセージ単位、欠損時は "Guest"）
    pub nick: Nick,
    /// メッセージ内容（欠損時は空文字）
    pub content: MessageContent,
    /// サーバ側で割り当てた受信時刻（UTC、ミリ秒）
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 新しい ChatMessage を作成
    pub fn new(nick: Nick, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            nick,
            content,
            timestamp,
        }
    }

    /// 受信フレームのフィールドから正規化して生成
    ///
    /// 欠損フィールドはデフォルト補完されます。拒否の経路はありません。
    pub fn from_inbound(
        nick: Option<String>,
        content: Option<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            nick: Nick::from_option(nick),
            content: MessageContent::from_option(content),
            timestamp,
        }
    }
}
