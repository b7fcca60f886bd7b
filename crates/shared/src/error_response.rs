//! # エラーレスポンス
//!
//! 成功時と同じ封筒形式のエラーレスポンスを提供する。
//!
//! ## 設計
//!
//! - `ErrorEnvelope` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は api クレートの責務
//! - `errors` はバリデーション失敗時のみ、`stack` は本番以外で中央のエラーハンドラを通ったエラーのみ出力する

use serde::{Deserialize, Serialize};

use crate::ResponseStatus;

/// バリデーションに失敗したフィールド
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// ドット区切りのフィールドパス（例: `id`, `filter.email`）
    pub path:    String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path:    path.into(),
            message: message.into(),
        }
    }
}

/// エラーレスポンス
///
/// `{ "status": "error", "statusCode", "message", "errors"?, "stack"? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status:      ResponseStatus,
    pub status_code: u16,
    pub message:     String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors:      Option<Vec<FieldIssue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack:       Option<String>,
}

impl ErrorEnvelope {
    /// 汎用コンストラクタ
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            status_code,
            message: message.into(),
            errors: None,
            stack: None,
        }
    }

    /// 400 バリデーションエラー
    pub fn validation_failed(errors: Vec<FieldIssue>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(400, "Validation failed")
        }
    }

    /// スタック情報を付与する
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}
