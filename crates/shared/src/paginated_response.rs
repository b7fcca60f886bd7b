//! # ページネーション付きレスポンス
//!
//! ページ番号ベースのページネーション情報を持つ封筒型。
//! 現時点でこの型を返すエンドポイントはない。

use serde::{Deserialize, Serialize};

use crate::ApiResponse;

/// ページネーション情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page:        u32,
    pub limit:       u32,
    pub total:       u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// `total_pages` を計算して作成する
    ///
    /// `limit` が 0 の場合は `total_pages` を 0 とする。
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = match u64::from(limit) {
            0 => 0,
            limit => total.div_ceil(limit),
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// ページネーション付きレスポンス
///
/// ## JSON 形式
///
/// ```json
/// {
///   "status": "success",
///   "statusCode": 200,
///   "message": "...",
///   "data": [...],
///   "pagination": { "page": 1, "limit": 20, "total": 41, "totalPages": 3 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(flatten)]
    pub envelope:   ApiResponse<Vec<T>>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(message: impl Into<String>, data: Vec<T>, pagination: PaginationMeta) -> Self {
        Self {
            envelope: ApiResponse::success(message, data),
            pagination,
        }
    }
}
