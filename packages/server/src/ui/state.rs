//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    AttachParticipantUseCase, CheckStoreHealthUseCase, DetachParticipantUseCase, GetRoomsUseCase,
    PublishMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// AttachParticipantUseCase（接続 attach のユースケース）
    pub attach_participant_usecase: Arc<AttachParticipantUseCase>,
    /// PublishMessageUseCase（メッセージ publish のユースケース）
    pub publish_message_usecase: Arc<PublishMessageUseCase>,
    /// DetachParticipantUseCase（接続 detach のユースケース）
    pub detach_participant_usecase: Arc<DetachParticipantUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// CheckStoreHealthUseCase（ストア疎通確認のユースケース）
    pub check_store_health_usecase: Arc<CheckStoreHealthUseCase>,
}
