//! # API レスポンスエンベロープ
//!
//! 全エンドポイントの統一レスポンス形式
//! `{ "status", "statusCode", "message", "data"? }` を提供する。

use serde::{Deserialize, Serialize};

/// レスポンスの成否
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// 統一レスポンス型
///
/// すべての JSON レスポンスはこの形をとる。`data` は値がある場合のみ出力される。
///
/// ## 使用例
///
/// ```
/// use qatoto_shared::{ApiResponse, ResponseStatus};
///
/// let response = ApiResponse::success("Users retrieved successfully", vec![1, 2, 3]);
/// assert_eq!(response.status, ResponseStatus::Success);
/// assert_eq!(response.status_code, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status:      ResponseStatus,
    pub status_code: u16,
    pub message:     String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data:        Option<T>,
}

impl<T> ApiResponse<T> {
    /// データ付きの 200 成功レスポンスを作成する
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status:      ResponseStatus::Success,
            status_code: 200,
            message:     message.into(),
            data:        Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// データなしの 200 成功レスポンスを作成する
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status:      ResponseStatus::Success,
            status_code: 200,
            message:     message.into(),
            data:        None,
        }
    }
}
