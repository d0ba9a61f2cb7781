//! ドメイン層
//!
//! Room・メッセージ・Backlog のドメインモデルと、Infrastructure 層が実装する
//! インターフェース（`RoomRegistry`）を定義します。

pub mod entity;
pub mod registry;
pub mod retention;
pub mod value_object;

pub use entity::ChatMessage;
pub use registry::{PusherChannel, RoomRegistry, RoomSummary};
pub use retention::{Backlog, RETENTION_WINDOW_MS};
pub use value_object::{ConnectionId, MessageContent, Nick, RoomId, Timestamp};
