//! # アプリケーション構築
//!
//! ルート定義とミドルウェアの積み上げを担当する。
//! `main.rs` と結合テストが同じ構成のルーターを使うため、ライブラリ側に置く。
//!
//! ## ミドルウェアの順序（外側から）
//!
//! ```text
//! 空の Request ID の除去 → SetRequestId → Trace → PropagateRequestId → リクエストログ → セキュリティヘッダー
//!   → CORS → エラーハンドラ → CatchPanic → ボディ上限 → Cookie 解析 → ルーター
//! ```

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state, map_request},
    routing::get,
};
use qatoto_shared::observability::{MakeRequestUuidV4, make_request_span};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{get_user, health_check, list_users, welcome},
    middleware::{
        BODY_LIMIT_BYTES,
        discard_blank_request_id,
        handle_errors,
        handle_panic,
        limit_body,
        log_request,
        parse_cookies,
        route_not_found,
        security_headers,
    },
    state::AppState,
};

/// ルーターを構築する
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.frontend_origin.clone());
    let environment = state.environment;

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(parse_cookies))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn(limit_body))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(environment, handle_errors))
        .layer(cors)
        .layer(from_fn(security_headers))
        .layer(from_fn(log_request))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
        .layer(map_request(discard_blank_request_id))
}

/// フロントエンドのオリジンだけを許可する CORS 設定
///
/// Cookie 付きのリクエストを許可する。他のオリジンには
/// `Access-Control-Allow-Origin` を返さない。
fn cors_layer(frontend_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([frontend_origin]))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
