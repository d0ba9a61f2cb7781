//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap を Room テーブルとして使用します。
//!
//! ## ロック設計
//!
//! Room テーブル全体を 1 つの `tokio::sync::Mutex` で保護します。
//! ロック区間はテーブル・接続集合・Backlog の変更のみで、ソケット I/O は
//! 含まれません。接続への配信は `UnboundedSender` への push（非ブロッキング）
//! であり、実際の WebSocket 書き込みは接続ごとの pusher タスクが行うため、
//! 遅いピアが他の接続への配信を止めることはありません。
//!
//! ## Room エントリのライフサイクル
//!
//! エントリの生成・削除は明示的に行います。attach と publish はエントリを
//! 作り、detach と配信失敗時の除去は接続集合と Backlog の両方が空になった
//! エントリをテーブルから削除します。読み取り（room_summaries）がエントリを
//! 作ることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Backlog, ChatMessage, ConnectionId, PusherChannel, RoomId, RoomRegistry, RoomSummary,
};
use crate::infrastructure::dto::websocket::OutboundFrame;

/// Room テーブルのエントリ
///
/// 接続集合と Backlog を 1 つのエントリが排他的に所有します。
struct RoomEntry {
    connections: HashMap<ConnectionId, PusherChannel>,
    backlog: Backlog,
}

impl RoomEntry {
    fn new() -> Self {
        Self {
            connections: HashMap::new(),
            backlog: Backlog::new(),
        }
    }

    /// 接続も Backlog も空なら true（エントリ削除の条件）
    fn is_vacant(&self) -> bool {
        self.connections.is_empty() && self.backlog.is_empty()
    }
}

/// インメモリ Room Registry 実装
///
/// Room ID → (接続集合, Backlog) のテーブルを保持し、ドメイン層の
/// RoomRegistry trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRegistry {
    /// Room テーブル
    rooms: Mutex<HashMap<RoomId, RoomEntry>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn attach(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Vec<ChatMessage> {
        let mut rooms = self.rooms.lock().await;

        // 最初の住人なら Room エントリをここで作る
        let entry = rooms
            .entry(room_id.clone())
            .or_insert_with(RoomEntry::new);
        entry.connections.insert(connection_id, sender);

        tracing::debug!(
            "Connection {} attached to room '{}' ({} connection(s), {} backlog message(s))",
            connection_id,
            room_id.as_str(),
            entry.connections.len(),
            entry.backlog.len()
        );

        // スナップショットは登録と同一ロック区間で取る。以降に publish された
        // メッセージは登録済みチャンネル経由で届くため、取りこぼしも重複もない。
        entry.backlog.snapshot()
    }

    async fn publish(
        &self,
        room_id: &RoomId,
        from: &ConnectionId,
        message: ChatMessage,
    ) -> usize {
        let now_ms = message.timestamp.value();
        let json = serde_json::to_string(&OutboundFrame::from(message.clone())).unwrap();

        let mut rooms = self.rooms.lock().await;

        // 接続が無くても Backlog への追加は有効なので、エントリはここでも作る
        let entry = rooms
            .entry(room_id.clone())
            .or_insert_with(RoomEntry::new);
        entry.backlog.append(message);
        entry.backlog.prune(now_ms);

        // 送信者以外へ fan-out。push に失敗した接続は dead とみなして
        // その場で接続集合から取り除く（次の publish まで残さない）。
        let mut delivered = 0;
        let mut dead: Vec<ConnectionId> = Vec::new();
        for (id, sender) in entry.connections.iter() {
            if id == from {
                continue;
            }
            if sender.send(json.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::warn!(
                    "Connection {} in room '{}' is gone, removing from room",
                    id,
                    room_id.as_str()
                );
                dead.push(*id);
            }
        }
        for id in &dead {
            entry.connections.remove(id);
        }

        delivered
    }

    async fn detach(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let mut rooms = self.rooms.lock().await;

        // 未知の Room への detach は no-op
        let Some(entry) = rooms.get_mut(room_id) else {
            return;
        };
        entry.connections.remove(connection_id);

        // Backlog が残っている間はエントリを保持し、後から attach した接続に
        // 履歴を渡す。両方空になった時点でエントリごと削除する。
        if entry.is_vacant() {
            rooms.remove(room_id);
            tracing::debug!("Room '{}' is empty, removed from registry", room_id.as_str());
        }
    }

    async fn room_summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;

        let mut summaries: Vec<RoomSummary> = rooms
            .iter()
            .map(|(id, entry)| RoomSummary {
                id: id.clone(),
                connections: entry.connections.len(),
                backlog: entry.backlog.len(),
            })
            .collect();

        // Sort by room id for consistent ordering
        summaries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, Nick, RETENTION_WINDOW_MS, Timestamp};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRegistry の attach / publish / detach / room_summaries
    // - fan-out の完全性（送信者以外の全接続に 1 通ずつ届く）
    // - 自己エコーが無いこと
    // - 配信失敗した接続がその場で除去されること
    // - Room エントリのライフサイクル（生成・GC・Backlog による延命）
    // - Backlog の保持期間（publish 時の lazy prune）
    //
    // 【なぜこのテストが必要か】
    // - Registry は全接続タスクから共有されるコア。配信・保持の不変条件が
    //   崩れるとメッセージの消失・重複につながる
    //
    // 【どのようなシナリオをテストするか】
    // 1. 空の Room への attach と最初のスナップショット
    // 2. 複数接続への fan-out と自己エコー除外
    // 3. 接続の無い Room への publish（Backlog のみ追加）
    // 4. attach 時の履歴受け取り（順序保証）
    // 5. dead 接続の即時除去
    // 6. detach の冪等性と Room の GC
    // 7. 期限切れメッセージの prune
    // ========================================

    fn message_at(nick: &str, content: &str, timestamp_ms: i64) -> ChatMessage {
        ChatMessage::new(
            Nick::new(nick.to_string()),
            MessageContent::new(content.to_string()),
            Timestamp::new(timestamp_ms),
        )
    }

    fn lobby() -> RoomId {
        RoomId::new("lobby".to_string())
    }

    #[tokio::test]
    async fn test_attach_to_empty_room_returns_empty_snapshot() {
        // テスト項目: 空の Room への attach は空のスナップショットを返す
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let snapshot = registry.attach(&lobby(), ConnectionId::generate(), tx).await;

        // then (期待する結果):
        assert!(snapshot.is_empty());

        let summaries = registry.room_summaries().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].connections, 1);
        assert_eq!(summaries[0].backlog, 0);
    }

    #[tokio::test]
    async fn test_publish_fans_out_to_others_but_not_sender() {
        // テスト項目: publish は送信者以外の全接続に届き、送信者には届かない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let charlie = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx_a).await;
        registry.attach(&lobby(), bob, tx_b).await;
        registry.attach(&lobby(), charlie, tx_c).await;

        // when (操作): alice がメッセージを送信
        let delivered = registry
            .publish(&lobby(), &alice, message_at("alice", "hi", 1000))
            .await;

        // then (期待する結果): bob と charlie に 1 通ずつ、alice には届かない
        assert_eq!(delivered, 2);

        let frame_b: OutboundFrame = serde_json::from_str(&rx_b.recv().await.unwrap()).unwrap();
        assert_eq!(frame_b.nick, "alice");
        assert_eq!(frame_b.content, "hi");
        let frame_c: OutboundFrame = serde_json::from_str(&rx_c.recv().await.unwrap()).unwrap();
        assert_eq!(frame_c.content, "hi");

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_preserves_order_per_room() {
        // テスト項目: 同一 Room 内の配信順序は append 順と一致する
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx_a).await;
        registry.attach(&lobby(), bob, tx_b).await;

        // when (操作):
        for i in 0..5 {
            registry
                .publish(&lobby(), &alice, message_at("alice", &format!("m{}", i), 1000 + i))
                .await;
        }

        // then (期待する結果):
        for i in 0..5 {
            let frame: OutboundFrame = serde_json::from_str(&rx_b.recv().await.unwrap()).unwrap();
            assert_eq!(frame.content, format!("m{}", i));
        }
    }

    #[tokio::test]
    async fn test_publish_to_room_without_connections_appends_backlog() {
        // テスト項目: 接続の無い Room への publish は Backlog への追加として有効
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();

        // when (操作):
        let delivered = registry
            .publish(&lobby(), &ConnectionId::generate(), message_at("alice", "hi", 1000))
            .await;

        // then (期待する結果): 配信 0 件だが Backlog には残る
        assert_eq!(delivered, 0);

        let summaries = registry.room_summaries().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].connections, 0);
        assert_eq!(summaries[0].backlog, 1);
    }

    #[tokio::test]
    async fn test_attach_receives_backlog_in_arrival_order() {
        // テスト項目: attach は未期限の Backlog を到着順で受け取る
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let sender_id = ConnectionId::generate();
        registry
            .publish(&lobby(), &sender_id, message_at("alice", "hi", 1000))
            .await;
        registry
            .publish(&lobby(), &sender_id, message_at("Guest", "bye", 2000))
            .await;

        // when (操作):
        let (tx, _rx) = mpsc::unbounded_channel();
        let snapshot = registry.attach(&lobby(), ConnectionId::generate(), tx).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].content.as_str(), "hi");
        assert_eq!(snapshot[1].content.as_str(), "bye");
    }

    #[tokio::test]
    async fn test_publish_removes_dead_connection_immediately() {
        // テスト項目: push に失敗した接続はその publish の中で除去される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx_a).await;
        registry.attach(&lobby(), bob, tx_b).await;

        // bob の受信側を先に落とす（切断イベントはまだ観測されていない想定）
        drop(rx_b);

        // when (操作):
        let delivered = registry
            .publish(&lobby(), &alice, message_at("alice", "hi", 1000))
            .await;

        // then (期待する結果): 配信 0 件、bob は接続集合から除去済み
        assert_eq!(delivered, 0);

        let summaries = registry.room_summaries().await;
        assert_eq!(summaries[0].connections, 1);

        // 残った alice への後続配信は影響を受けない
        let delivered = registry
            .publish(&lobby(), &bob, message_at("bob", "late", 2000))
            .await;
        assert_eq!(delivered, 1);
    }

    #[tokio::test]
    async fn test_detach_is_idempotent_and_unknown_room_is_noop() {
        // テスト項目: detach は冪等で、未知の Room への detach は no-op
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let alice = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx).await;

        // when (操作):
        registry.detach(&lobby(), &alice).await;
        registry.detach(&lobby(), &alice).await;
        registry
            .detach(&RoomId::new("nowhere".to_string()), &alice)
            .await;

        // then (期待する結果): パニックもエラーも無く、Room は消えている
        assert!(registry.room_summaries().await.is_empty());
    }

    #[tokio::test]
    async fn test_room_is_garbage_collected_when_both_sides_empty() {
        // テスト項目: 最後の接続が detach し Backlog も空なら Room は消える
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let alice = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx).await;

        // when (操作):
        registry.detach(&lobby(), &alice).await;

        // then (期待する結果):
        assert!(registry.room_summaries().await.is_empty());
    }

    #[tokio::test]
    async fn test_backlog_survives_last_detach_and_is_delivered_on_reattach() {
        // テスト項目: Backlog が残っている Room は最後の detach 後も履歴を保持し、
        //             再 attach で履歴が届く
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let alice = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx).await;
        registry
            .publish(&lobby(), &alice, message_at("alice", "hi", 1000))
            .await;

        // when (操作): alice が切断
        registry.detach(&lobby(), &alice).await;

        // then (期待する結果): 接続 0 でも Room は Backlog 側で生きている
        let summaries = registry.room_summaries().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].connections, 0);
        assert_eq!(summaries[0].backlog, 1);

        // 再 attach で履歴が届く
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let snapshot = registry.attach(&lobby(), ConnectionId::generate(), tx2).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content.as_str(), "hi");
    }

    #[tokio::test]
    async fn test_publish_prunes_expired_messages() {
        // テスト項目: publish は新メッセージのタイムスタンプ基準で期限切れを prune する
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let sender_id = ConnectionId::generate();
        registry
            .publish(&lobby(), &sender_id, message_at("alice", "old", 1000))
            .await;

        // when (操作): 48 時間 + 1ms 後のメッセージが届く
        registry
            .publish(
                &lobby(),
                &sender_id,
                message_at("alice", "new", 1000 + RETENTION_WINDOW_MS + 1),
            )
            .await;

        // then (期待する結果): 古いメッセージは消え、新しいものだけ残る
        let (tx, _rx) = mpsc::unbounded_channel();
        let snapshot = registry.attach(&lobby(), ConnectionId::generate(), tx).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content.as_str(), "new");
    }

    #[tokio::test]
    async fn test_stale_backlog_is_kept_until_next_publish() {
        // テスト項目: メッセージが来ない限り prune は走らず、期限切れ履歴も
        //             attach でそのまま届く（lazy eviction の挙動）
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let sender_id = ConnectionId::generate();
        registry
            .publish(&lobby(), &sender_id, message_at("alice", "stale", 1000))
            .await;

        // when (操作): 48 時間経過後に attach（publish は無い）
        let (tx, _rx) = mpsc::unbounded_channel();
        let snapshot = registry.attach(&lobby(), ConnectionId::generate(), tx).await;

        // then (期待する結果): attach は prune しないので履歴はまだ見える
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_room_summaries_are_sorted_by_id() {
        // テスト項目: Room 概況一覧は Room ID でソートされている
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let sender_id = ConnectionId::generate();
        for name in ["charlie", "alice", "bob"] {
            registry
                .publish(
                    &RoomId::new(name.to_string()),
                    &sender_id,
                    message_at("g", "m", 1000),
                )
                .await;
        }

        // when (操作):
        let summaries = registry.room_summaries().await;

        // then (期待する結果):
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_lobby_scenario() {
        // テスト項目: lobby シナリオ全体
        //   A, B が attach → A が送信（B だけ受信）→ A が detach →
        //   B が nick 無しで送信（誰にも届かないが Backlog に残る）→
        //   C が attach して [hi, bye] を順番に受け取る
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.attach(&lobby(), a, tx_a).await;
        registry.attach(&lobby(), b, tx_b).await;

        // when (操作): A が {nick: "alice", content: "hi"} を送信
        let delivered = registry
            .publish(&lobby(), &a, message_at("alice", "hi", 1000))
            .await;

        // then (期待する結果): B は受信し、A には何も届かない
        assert_eq!(delivered, 1);
        let frame: OutboundFrame = serde_json::from_str(&rx_b.recv().await.unwrap()).unwrap();
        assert_eq!(frame.nick, "alice");
        assert_eq!(frame.content, "hi");
        assert!(rx_a.try_recv().is_err());

        // when (操作): A が切断し、B が nick 無しで {content: "bye"} を送信
        registry.detach(&lobby(), &a).await;
        let delivered = registry
            .publish(&lobby(), &b, message_at("Guest", "bye", 2000))
            .await;

        // then (期待する結果): 誰にも届かないが Backlog には残る
        assert_eq!(delivered, 0);

        // when (操作): 48 時間以内に C が attach
        let c = ConnectionId::generate();
        let (tx_c, _rx_c) = mpsc::unbounded_channel();
        let snapshot = registry.attach(&lobby(), c, tx_c).await;

        // then (期待する結果): [hi, bye] を順番に受け取る
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].content.as_str(), "hi");
        assert_eq!(snapshot[0].nick.as_str(), "alice");
        assert_eq!(snapshot[1].content.as_str(), "bye");
        assert_eq!(snapshot[1].nick.as_str(), "Guest");
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: fan-out と Backlog は Room をまたがない
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let other = RoomId::new("other".to_string());
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.attach(&lobby(), alice, tx_a).await;
        registry.attach(&other, bob, tx_b).await;

        // when (操作): lobby にだけ publish
        let delivered = registry
            .publish(&lobby(), &alice, message_at("alice", "hi", 1000))
            .await;

        // then (期待する結果): other の bob には届かない
        assert_eq!(delivered, 0);
        assert!(rx_b.try_recv().is_err());

        let (tx, _rx) = mpsc::unbounded_channel();
        let snapshot = registry.attach(&other, ConnectionId::generate(), tx).await;
        assert!(snapshot.is_empty());
    }
}
