//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! qatoto-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use qatoto_domain::user::{User, UserId};

use crate::{error::InfraError, repository::UserRepository};

// ===== MockUserRepository =====

/// テスト用のモック UserRepository
///
/// 追加した順にユーザーを保持する。`fail_with_database_error(true)` で
/// 以降の呼び出しがすべてエラーを返すようになる。
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users:   Arc<Mutex<Vec<User>>>,
    failing: Arc<AtomicBool>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// データベース障害を模擬する
    pub fn fail_with_database_error(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_all(&self, limit: i64) -> Result<Vec<User>, InfraError> {
        self.check_failure()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        self.check_failure()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned())
    }
}
