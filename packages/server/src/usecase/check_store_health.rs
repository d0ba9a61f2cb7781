//! UseCase: ストア疎通確認
//!
//! リレーショナルストアに対する trivial な round-trip（`SELECT 1`）を実行します。
//! チャット本体はストアに依存しません（メッセージは純粋にインメモリ）。
//! この確認はストアという依存先に到達できるかを報告するためだけにあります。

use sqlx::PgPool;

use super::error::StoreHealthError;

/// ストア疎通確認のユースケース
pub struct CheckStoreHealthUseCase {
    /// 接続プール（lazy 接続。最初のクエリまでストアには触れない）
    pool: PgPool,
}

impl CheckStoreHealthUseCase {
    /// 新しい CheckStoreHealthUseCase を作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `SELECT 1` を実行して結果を返す
    ///
    /// # Returns
    ///
    /// * `Ok(1)` - ストアに到達できた
    /// * `Err(StoreHealthError)` - 到達できなかった（詳細は呼び出し側で文字列化）
    pub async fn execute(&self) -> Result<i32, StoreHealthError> {
        let result: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(result)
    }
}
