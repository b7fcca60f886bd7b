//! # リクエストログミドルウェア
//!
//! 1 リクエストにつき 1 行、開発者向けの簡潔な形式でログを出す。
//!
//! ```text
//! GET /users?x=1 200 3.142 ms - 512
//! ```
//!
//! 長さが分からない（ストリーミング等）場合は `-` を出力する。

use std::time::Instant;

use axum::{
    body::HttpBody as _,
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

/// リクエストごとに 1 行のログを出力する
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let length = response_length(&response).map_or_else(|| "-".to_string(), |n| n.to_string());
    tracing::info!(
        "{} {} {} {:.3} ms - {}",
        method,
        uri,
        response.status().as_u16(),
        elapsed_ms,
        length
    );

    response
}

fn response_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .or_else(|| response.body().size_hint().exact())
}
