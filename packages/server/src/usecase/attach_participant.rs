//! UseCase: 接続の Attach 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AttachParticipantUseCase::execute() メソッド
//! - 接続の登録と Backlog スナップショットの受け取り
//!
//! ### なぜこのテストが必要か
//! - attach したクライアントがライブ配信より先に履歴を受け取れることを保証
//! - Room エントリが無い場合に自動的に作られることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空の Room / 履歴のある Room への attach
//! - エッジケース：同一 Room への複数接続

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, PusherChannel, RoomId, RoomRegistry};

/// 接続 attach のユースケース
pub struct AttachParticipantUseCase {
    /// Registry（接続管理と fan-out の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl AttachParticipantUseCase {
    /// 新しい AttachParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Attach を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - attach 先の Room ID
    /// * `connection_id` - この接続の ID
    /// * `sender` - この接続へメッセージを push するためのチャンネル
    ///
    /// # Returns
    ///
    /// Backlog のスナップショット（到着順）。呼び出し側はこれをライブ配信より
    /// 先にクライアントへ送る必要があります。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Vec<ChatMessage> {
        let snapshot = self.registry.attach(room_id, connection_id, sender).await;

        tracing::info!(
            "Connection {} attached to room '{}' ({} backlog message(s))",
            connection_id,
            room_id.as_str(),
            snapshot.len()
        );

        snapshot
    }
}
