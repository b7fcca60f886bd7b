//! # UserRepository
//!
//! `users` テーブルの読み取りを担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: 一覧取得と ID 検索のみを提供する
//! - **列型に依存しない取得**: `id` は `::text`、`created_at` は `::timestamptz` に
//!   キャストして取得し、列の実際の型に関わらず同じ行型で受ける
//! - **列そのもので検索する**: ID 検索では列をキャストせず、パラメータを列の型に
//!   キャストして比較する（主キーのインデックスを使うため）。列の型は初回の検索時に
//!   カタログから取得してキャッシュする。列の型に変換できない ID は「見つからない」とする
//! - **保存済みの値はそのまま返す**: NULL や形式外の値を含む行があっても一覧全体を
//!   失敗させない

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qatoto_domain::user::{Email, User, UserId};
use tokio::sync::OnceCell;

use crate::{
    db::{Database, QueryParam},
    error::InfraError,
};

const SELECT_USERS: &str = r#"
    SELECT
        id::text AS id,
        email,
        created_at::timestamptz AS created_at
    FROM users
    LIMIT $1
"#;

/// `users.id` 列の型名（型修飾子なし）
const SELECT_ID_COLUMN_TYPE: &str = r#"
    SELECT format_type(a.atttypid, NULL) AS id_type
    FROM pg_attribute a
    WHERE a.attrelid = to_regclass('users')
      AND a.attname = 'id'
      AND NOT a.attisdropped
"#;

/// ID 検索の SQL
///
/// `id_type` はカタログから取得した型名。
fn select_user_by_id(id_type: &str) -> String {
    format!(
        r#"
    SELECT
        id::text AS id,
        email,
        created_at::timestamptz AS created_at
    FROM users
    WHERE id = $1::{id_type}
"#
    )
}

/// ユーザーリポジトリトレイト
///
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを最大 `limit` 件取得する
    ///
    /// 並び順は保証しない（`ORDER BY` なし）。
    async fn find_all(&self, limit: i64) -> Result<Vec<User>, InfraError>;

    /// ID でユーザーを検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: ユーザーが見つかった場合
    /// - `Ok(None)`: ユーザーが見つからない場合（ID を列の型に変換できない場合を含む）
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    database: Database,
    id_type:  Arc<OnceCell<String>>,
}

impl PostgresUserRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(database: Database) -> Self {
        Self {
            database,
            id_type: Arc::new(OnceCell::new()),
        }
    }

    /// `users.id` 列の型名を返す（初回のみカタログを参照する）
    async fn id_column_type(&self) -> Result<&str, InfraError> {
        self.id_type
            .get_or_try_init(|| async {
                let output = self
                    .database
                    .query::<(String,)>(SELECT_ID_COLUMN_TYPE, &[])
                    .await?;
                output
                    .rows
                    .into_iter()
                    .next()
                    .map(|(id_type,)| id_type)
                    .ok_or_else(|| InfraError::unexpected("users.id 列が見つかりません"))
            })
            .await
            .map(String::as_str)
    }
}

/// `users` テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id:         String,
    email:      Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_stored(
            UserId::from_stored(row.id),
            row.email.map(Email::from_stored),
            row.created_at,
        )
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(limit))]
    async fn find_all(&self, limit: i64) -> Result<Vec<User>, InfraError> {
        let output = self
            .database
            .query::<UserRow>(SELECT_USERS, &[QueryParam::Int(limit)])
            .await?;

        Ok(output.rows.into_iter().map(User::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        let statement = select_user_by_id(self.id_column_type().await?);

        match self
            .database
            .query::<UserRow>(&statement, &[QueryParam::Text(id.to_string())])
            .await
        {
            Ok(output) => Ok(output.rows.into_iter().next().map(User::from)),
            Err(e) if e.is_invalid_input() => {
                tracing::debug!(error = %e, "ID を列の型に変換できないため、該当なしとします");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
