//! # Request ID 前処理
//!
//! `SetRequestIdLayer` はヘッダーが存在すれば中身を問わずそのまま使うため、
//! その手前で空（空白のみを含む）の `x-request-id` を取り除き、新しい ID を生成させる。

use axum::extract::Request;
use qatoto_shared::observability::REQUEST_ID_HEADER;

/// 空の `x-request-id` ヘッダーを取り除く
pub async fn discard_blank_request_id(mut request: Request) -> Request {
    let blank = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .is_some_and(|value| value.as_bytes().iter().all(u8::is_ascii_whitespace));

    if blank {
        request.headers_mut().remove(REQUEST_ID_HEADER);
    }

    request
}
