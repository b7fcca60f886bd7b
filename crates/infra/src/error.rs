//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From<sqlx::Error>` や convenience constructor でエラーを生成すると、
//! その時点のスパン情報（呼び出し経路）が自動的に記録される。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// 入力値を列の型に変換できなかったことを示す SQLSTATE
///
/// - `22P02`: invalid_text_representation（`'abc'::bigint` など）
/// - `22003`: numeric_value_out_of_range
const INVALID_INPUT_SQLSTATES: [&str; 2] = ["22P02", "22003"];

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// SQL の実行失敗、接続エラー、接続取得タイムアウトなど。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 予期しないエラー
    ///
    /// DB から取得した値がドメインのルールに違反している場合など。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 入力値を列の型に変換できずに失敗したかどうか
    pub fn is_invalid_input(&self) -> bool {
        match &self.kind {
            InfraErrorKind::Database(sqlx::Error::Database(e)) => e
                .code()
                .is_some_and(|code| INVALID_INPUT_SQLSTATES.contains(&code.as_ref())),
            _ => false,
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
