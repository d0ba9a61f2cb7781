//! UseCase 層のエラー型定義
//!
//! チャット経路のエラーは全てローカルで回復されるため（配信失敗は接続の除去、
//! 欠損フィールドはデフォルト補完）、エラー型を持つのはストア疎通確認だけです。

use thiserror::Error;

/// ストア疎通確認のエラー
#[derive(Debug, Error)]
pub enum StoreHealthError {
    /// ストアへの round-trip に失敗
    #[error("DB connection failed: {0}")]
    RoundTrip(#[from] sqlx::Error),
}
