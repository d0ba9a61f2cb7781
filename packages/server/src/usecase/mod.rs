//! UseCase 層
//!
//! ドメイン層のインターフェースを組み合わせて、接続の attach / detach、
//! メッセージの publish、ストア疎通確認などのアプリケーション操作を提供します。

pub mod attach_participant;
pub mod check_store_health;
pub mod detach_participant;
pub mod error;
pub mod get_rooms;
pub mod publish_message;

pub use attach_participant::AttachParticipantUseCase;
pub use check_store_health::CheckStoreHealthUseCase;
pub use detach_participant::DetachParticipantUseCase;
pub use error::StoreHealthError;
pub use get_rooms::GetRoomsUseCase;
pub use publish_message::PublishMessageUseCase;
