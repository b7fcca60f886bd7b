//! ユーザー参照ユースケース

use std::sync::Arc;

use qatoto_domain::user::{User, UserId};
use qatoto_infra::repository::UserRepository;

use crate::error::CoreError;

/// 一覧取得で返す最大件数
pub const USER_LIST_LIMIT: i64 = 100;

/// ユーザー参照ユースケース
pub struct UserUseCaseImpl {
    user_repository: Arc<dyn UserRepository>,
}

impl UserUseCaseImpl {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// ユーザーを最大 [`USER_LIST_LIMIT`] 件取得する
    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        let users = self.user_repository.find_all(USER_LIST_LIMIT).await?;
        Ok(users)
    }

    /// ID でユーザーを取得する
    ///
    /// 存在しない場合は `Ok(None)` を返す。404 への変換はハンドラの責務。
    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>, CoreError> {
        let user = self.user_repository.find_by_id(id).await?;
        Ok(user)
    }
}
