//! # 未定義ルートハンドラ
//!
//! どのルートにも一致しないリクエスト（メソッド不一致を含む）を
//! 404 として中央のエラーハンドラに渡す。

use axum::http::{Method, Uri};

use crate::error::CoreError;

/// 404 `Route not found: METHOD PATH` を返す
///
/// `PATH` はクエリ文字列を含む。
pub async fn route_not_found(method: Method, uri: Uri) -> CoreError {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    CoreError::RouteNotFound { method, path }
}
