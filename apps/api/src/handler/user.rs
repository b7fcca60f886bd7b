//! # ユーザーハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /users` - ユーザー一覧（最大 100 件）
//! - `GET /users/{id}` - ユーザー情報を取得

use axum::{Json, extract::State};
use qatoto_domain::user::{User, UserId};
use qatoto_shared::{ApiResponse, FieldIssue};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::CoreError,
    state::AppState,
    validation::{RequestContract, ValidPath},
};

/// `/users/{id}` のパスパラメータ（検証前）
#[derive(Debug, Deserialize, Validate)]
pub struct UserIdParamsRaw {
    #[validate(length(min = 1, max = 128, message = "id must be 1 to 128 characters"))]
    pub id: String,
}

/// `/users/{id}` のパスパラメータ（検証後）
#[derive(Debug)]
pub struct UserIdParams {
    /// 検索に使う ID
    pub id:  UserId,
    /// クライアントが送った値そのもの（エラーメッセージ用）
    pub raw: String,
}

impl RequestContract for UserIdParams {
    type Raw = UserIdParamsRaw;

    fn parse(raw: Self::Raw) -> Result<Self, Vec<FieldIssue>> {
        UserId::new(raw.id.as_str())
            .map(|id| Self { id, raw: raw.id })
            .map_err(|e| vec![FieldIssue::new("id", e.to_string())])
    }
}

/// ユーザー一覧を取得する
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, CoreError> {
    let users = state.users.list_users().await?;

    Ok(Json(ApiResponse::success(
        "Users retrieved successfully",
        users,
    )))
}

/// ID でユーザーを取得する
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    ValidPath(params): ValidPath<UserIdParams>,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let user = state
        .users
        .get_user(&params.id)
        .await?
        .ok_or(CoreError::UserNotFound(params.raw))?;

    Ok(Json(ApiResponse::success("User retrieved successfully", user)))
}
