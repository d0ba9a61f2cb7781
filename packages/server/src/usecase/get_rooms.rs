//! UseCase: Room 一覧取得処理

use std::sync::Arc;

use crate::domain::{RoomRegistry, RoomSummary};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Registry（接続管理と fan-out の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 生存している Room の概況一覧を取得
    ///
    /// # Returns
    ///
    /// Room ID でソート済みの概況一覧
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.registry.room_summaries().await
    }
}
