//! Backlog（保持ストア）
//!
//! Room ごとのメッセージ履歴を到着順で保持し、48 時間の保持期間を強制します。
//!
//! ## Lazy eviction
//!
//! 期限切れの削除（prune）は新しいメッセージの到着時にのみ行われ、
//! 定期スイーパーは存在しません。そのため、48 時間以上メッセージが来ない
//! Room の履歴は次のメッセージ到着まで残り続け、その間に attach した接続は
//! 期限切れの履歴をそのまま受け取ります。これは意図した挙動でありバグでは
//! ありません。より厳密にしたい呼び出し側は attach 時にも prune してください。

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// メッセージ保持期間（48 時間、ミリ秒）
pub const RETENTION_WINDOW_MS: i64 = 48 * 60 * 60 * 1000;

/// Room ごとの保持ストア
///
/// 到着順（= append 順）のメッセージ列。件数は無制限で、経過時間のみで
/// 削除されます。
#[derive(Debug, Default)]
pub struct Backlog {
    messages: VecDeque<ChatMessage>,
}

impl Backlog {
    /// 空の Backlog を作成
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
        }
    }

    /// メッセージを末尾に追加（追加順 = 到着順）
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
    }

    /// `now_ms` 時点で保持期間を超えたメッセージを全て削除
    ///
    /// 各 append の直後に同期的に呼ばれます。
    pub fn prune(&mut self, now_ms: i64) {
        self.messages
            .retain(|message| now_ms - message.timestamp.value() <= RETENTION_WINDOW_MS);
    }

    /// 到着順のスナップショットを返す
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
