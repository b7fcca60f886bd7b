//! # ボディサイズ制限ミドルウェア
//!
//! 上限を超えるリクエストボディをルーティング前に 413 で拒否する。
//!
//! - `Content-Length` やボディのサイズヒントで長さが分かる場合は、読まずに判定する
//! - 長さが分からないボディ（chunked など）は上限まで読み込み、超えた時点で拒否する。
//!   上限内に収まったボディはメモリ上のボディに差し替えて後続に渡す

use axum::{
    body::{Body, HttpBody as _},
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::StreamExt as _;

use crate::error::CoreError;

/// リクエストボディの上限（10KB）
pub const BODY_LIMIT_BYTES: usize = 10 * 1024;

const LIMIT: u64 = BODY_LIMIT_BYTES as u64;

/// 上限を超えるボディを持つリクエストを拒否する
pub async fn limit_body(request: Request, next: Next) -> Response {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    let hint = request.body().size_hint();

    if declared.is_some_and(|length| length > LIMIT) || hint.lower() > LIMIT {
        return CoreError::PayloadTooLarge.into_response();
    }

    if hint.upper().is_some_and(|upper| upper <= LIMIT) {
        return next.run(request).await;
    }

    match buffer_within_limit(request).await {
        Ok(request) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// ボディを上限まで読み込み、読み込んだ内容で組み立て直したリクエストを返す
async fn buffer_within_limit(request: Request) -> Result<Request, CoreError> {
    let (parts, body) = request.into_parts();
    let mut stream = body.into_data_stream();
    let mut buffered = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CoreError::UnreadableBody(e.to_string()))?;
        if buffered.len() + chunk.len() > BODY_LIMIT_BYTES {
            return Err(CoreError::PayloadTooLarge);
        }
        buffered.extend_from_slice(&chunk);
    }

    Ok(Request::from_parts(parts, Body::from(buffered)))
}
