//! # ルートハンドラ

use axum::Json;
use qatoto_shared::ApiResponse;

/// `GET /` のメッセージ
pub const WELCOME_MESSAGE: &str = "Welcome to QAToto API";

/// ウェルカムメッセージを返す
pub async fn welcome() -> Json<ApiResponse<()>> {
    Json(ApiResponse::ok(WELCOME_MESSAGE))
}
