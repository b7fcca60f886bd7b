//! # Cookie 解析ミドルウェア
//!
//! `Cookie` ヘッダーを [`CookieJar`] に解析し、リクエストの extensions に格納する。
//! ハンドラは `Extension<CookieJar>` で受け取れる。

use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::CookieJar;

/// `Cookie` ヘッダーを解析して extensions に格納する
pub async fn parse_cookies(mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    request.extensions_mut().insert(jar);
    next.run(request).await
}
