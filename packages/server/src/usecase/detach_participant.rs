//! UseCase: 接続の Detach 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DetachParticipantUseCase::execute() メソッド
//! - 接続の除去と Room エントリの GC
//!
//! ### なぜこのテストが必要か
//! - 接続終了時に dead な接続が Room に残らないことを保証
//! - detach の冪等性（二重 detach・未知の Room）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続の detach と Room の GC
//! - エッジケース：Backlog が残っている Room の detach、二重 detach

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRegistry};

/// 接続 detach のユースケース
pub struct DetachParticipantUseCase {
    /// Registry（接続管理と fan-out の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl DetachParticipantUseCase {
    /// 新しい DetachParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Detach を実行（冪等）
    ///
    /// # Arguments
    ///
    /// * `room_id` - 接続が属していた Room の ID
    /// * `connection_id` - 取り除く接続の ID
    pub async fn execute(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        self.registry.detach(room_id, connection_id).await;

        tracing::info!(
            "Connection {} detached from room '{}'",
            connection_id,
            room_id.as_str()
        );
    }
}
