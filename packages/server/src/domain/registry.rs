//! Room Registry trait 定義
//!
//! ドメイン層が必要とする接続管理と fan-out のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 依存性の逆転（DIP）
//!
//! - ドメイン層が必要とするインターフェースをドメイン層自身が定義
//! - Infrastructure 層がドメイン層のインターフェースに依存
//! - ドメイン層は Infrastructure 層に依存しない

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, ConnectionId, RoomId};

/// クライアントへメッセージを push するためのチャンネル
///
/// 実際のソケット書き込みは接続ごとの pusher タスクが行うため、
/// Registry のロック中に I/O は発生しません。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Room の概況（HTTP API 向け）
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub id: RoomId,
    /// 接続中のコネクション数
    pub connections: usize,
    /// Backlog に保持されているメッセージ数
    pub backlog: usize,
}

/// Room Registry trait
///
/// Room ごとの接続集合と Backlog を排他的に所有し、fan-out を仲介します。
/// どのエンティティも Room をまたいで共有されず、Room より長くは生きません。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 接続を Room に登録し、Backlog のスナップショットを返す
    ///
    /// Room エントリが無ければここで作られます。スナップショット取得と
    /// チャンネル登録は単一のロック区間で行われるため、attach と並行して
    /// publish されたメッセージは「スナップショット経由」か「ライブ fan-out
    /// 経由」のどちらか一方で必ず届きます（両方にも、どちらにも漏れません）。
    async fn attach(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Vec<ChatMessage>;

    /// メッセージを Backlog に追加し、送信者以外の全接続に配信する
    ///
    /// 配信はベストエフォートです。push に失敗した接続は dead とみなし、
    /// その場で接続集合から取り除きます（ログに残すだけにはしません）。
    /// 接続が 1 つも無い Room への publish も Backlog への追加としては有効です。
    /// 配信できた接続数を返します。
    async fn publish(
        &self,
        room_id: &RoomId,
        from: &ConnectionId,
        message: ChatMessage,
    ) -> usize;

    /// 接続を Room から取り除く（冪等）
    ///
    /// 存在しない Room / 接続への detach は no-op です。接続集合と Backlog の
    /// 両方が空になった Room はエントリごと削除されます。
    async fn detach(&self, room_id: &RoomId, connection_id: &ConnectionId);

    /// 接続中の Room の概況一覧を取得
    async fn room_summaries(&self) -> Vec<RoomSummary>;
}
