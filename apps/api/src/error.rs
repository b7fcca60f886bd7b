//! # API エラー定義
//!
//! API で発生するエラーと、封筒形式の HTTP レスポンスへの変換を定義する。
//!
//! ## エラーの流れ
//!
//! ```text
//! InfraError ──From──▶ CoreError ──IntoResponse──▶ Response + ErrorReport（extension）
//!                                                        │
//!                                     handle_errors ミドルウェアがログ出力・stack 付与
//! ```
//!
//! `IntoResponse` の時点では実行環境が分からないため、レスポンス本体には
//! `stack` を含めず、[`ErrorReport`] を extension として載せる。
//! 本番以外で `stack` を出すかどうかは [`handle_errors`](crate::middleware::handle_errors) が決める。

use std::error::Error as _;

use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use qatoto_infra::InfraError;
use qatoto_shared::ErrorEnvelope;
use thiserror::Error;
use tracing_error::SpanTrace;

/// クライアントに返す 500 のメッセージ
const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// 指定 ID のユーザーが存在しない
    ///
    /// ID はクライアントが送った値そのもの。
    #[error("User with id '{0}' not found")]
    UserNotFound(String),

    /// どのルートにも一致しない
    ///
    /// `path` はクエリ文字列を含む。
    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// リクエストボディが上限を超えている
    #[error("request entity too large")]
    PayloadTooLarge,

    /// リクエストボディを読み込めない（途中で切断された場合など）
    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound(_) | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnreadableBody(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// クライアントに返すメッセージ
    ///
    /// 500 系の詳細はレスポンスの `message` には出さない。
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// エラーの発生経路
    ///
    /// ハンドラが直接返す `UserNotFound` は経路を持たない。
    fn stack(&self) -> Option<String> {
        if matches!(self, Self::UserNotFound(_)) {
            return None;
        }

        let mut stack = format!("Error: {self}");
        let mut source = self.source();
        while let Some(cause) = source {
            stack.push_str(&format!("\n    caused by: {cause}"));
            source = cause.source();
        }

        let span_trace = match self {
            Self::Database(e) => e.span_trace().to_string(),
            _ => SpanTrace::capture().to_string(),
        };
        if !span_trace.is_empty() {
            stack.push('\n');
            stack.push_str(&span_trace);
        }

        Some(stack)
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status:  self.status(),
            message: self.client_message(),
            detail:  self.to_string(),
            stack:   self.stack(),
        }
    }
}

/// エラーレスポンスに添付される報告
///
/// 中央のエラーハンドラがログ出力と `stack` の付与に使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub status:  StatusCode,
    /// レスポンスの `message`
    pub message: String,
    /// ログ用の詳細（内部エラーの内容を含む）
    pub detail:  String,
    pub stack:   Option<String>,
}

impl ErrorReport {
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status.as_u16(), self.message.clone())
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let report = self.report();
        let mut response = (report.status, Json(report.envelope())).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
