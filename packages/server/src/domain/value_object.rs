//! Value Object 定義
//!
//! ドメイン層の値オブジェクト。Room ID はクライアントが接続時に指定する
//! 不透明な文字列キーであり、事前登録も検証も行いません。

use std::fmt;

use uuid::Uuid;

/// Room ID
///
/// クライアントが接続パス（`/ws/{room_id}`）で指定する不透明な文字列キー。
/// Room は接続または Backlog が存在した瞬間に暗黙的に生まれ、
/// 両方が空になった時点で Registry から消えます。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// 新しい RoomId を作成（検証なし、大文字小文字は区別される）
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 接続 ID
///
/// サーバ内部で接続を識別するための UUID。参加者の同一性は持ちません。
/// 表示名（Nick）は接続ではなくメッセージ単位で送信者が付けます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 表示名
///
/// メッセージ単位の送信者の表示名。省略時は `"Guest"` に正規化されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nick(String);

impl Nick {
    /// 欠損時のデフォルト表示名
    pub const DEFAULT: &str = "Guest";

    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// 受信フレームのフィールドから正規化して生成（欠損はデフォルト補完）
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(value) => Self(value),
            None => Self(Self::DEFAULT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// メッセージ内容
///
/// 省略時は空文字に正規化されます。拒否・エラーフレームの経路は存在しません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// 受信フレームのフィールドから正規化して生成（欠損は空文字）
    pub fn from_option(value: Option<String>) -> Self {
        Self(value.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// タイムスタンプ（UTC、ミリ秒）
///
/// メッセージ受信時にサーバ側で割り当てます。クライアント提供の時刻は
/// 信用しないため、Room 内の順序キーとして使えます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
