//! # ヘルスチェックハンドラ
//!
//! アプリケーションの稼働状態を確認するためのエンドポイント。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "success",
//!   "statusCode": 200,
//!   "message": "OK",
//!   "uptime": 12.345,
//!   "timestamp": "2025-06-01T12:00:00.000Z"
//! }
//! ```
//!
//! データベースへの接続は確認せず、プロセス自体の稼働のみを返す。

use axum::{Json, extract::State};
use chrono::Utc;
use qatoto_shared::HealthResponse;

use crate::state::AppState;

/// ヘルスチェックエンドポイント
///
/// 常に 200 OK を返す。`uptime` はプロセス起動からの経過秒数。
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.started_at.elapsed(), Utc::now()))
}
