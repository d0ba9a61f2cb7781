//! UseCase: メッセージ publish 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PublishMessageUseCase::execute() メソッド
//! - 受信フレームの正規化（デフォルト補完）とサーバ側タイムスタンプの付与
//! - Registry 経由の fan-out（送信者除外）
//!
//! ### なぜこのテストが必要か
//! - 欠損フィールドが拒否ではなくデフォルト補完されることを保証
//! - タイムスタンプがクライアントではなくサーバの時計で付くことを確認
//! - 送信者に自分のメッセージが返らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：全フィールドが揃ったフレームの publish
//! - エッジケース：空フレーム {}、送信者しかいない Room

use std::sync::Arc;

use idobata_shared::time::Clock;

use crate::domain::{ChatMessage, ConnectionId, RoomId, RoomRegistry, Timestamp};

/// メッセージ publish のユースケース
pub struct PublishMessageUseCase {
    /// Registry（接続管理と fan-out の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// タイムスタンプ付与に使う時計
    clock: Arc<dyn Clock>,
}

impl PublishMessageUseCase {
    /// 新しい PublishMessageUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// メッセージ publish を実行
    ///
    /// 受信フレームを正規化（nick 欠損は "Guest"、content 欠損は空文字）し、
    /// タイムスタンプをサーバ側で割り当ててから Registry へ渡します。
    /// Backlog への追加・prune・fan-out は Registry が 1 サイクルで行います。
    ///
    /// # Arguments
    ///
    /// * `room_id` - publish 先の Room ID
    /// * `from` - 送信元の接続 ID（fan-out から除外される）
    /// * `nick` - 受信フレームの nick フィールド（欠損可）
    /// * `content` - 受信フレームの content フィールド（欠損可）
    ///
    /// # Returns
    ///
    /// 正規化・タイムスタンプ付与済みの ChatMessage
    pub async fn execute(
        &self,
        room_id: &RoomId,
        from: &ConnectionId,
        nick: Option<String>,
        content: Option<String>,
    ) -> ChatMessage {
        let timestamp = Timestamp::new(self.clock.now_utc_millis());
        let message = ChatMessage::from_inbound(nick, content, timestamp);

        let delivered = self.registry.publish(room_id, from, message.clone()).await;

        tracing::debug!(
            "Message from {} delivered to {} connection(s) in room '{}'",
            from,
            delivered,
            room_id.as_str()
        );

        message
    }
}
