//! # 中央エラーハンドラ
//!
//! 内側のレイヤーやハンドラが返したエラーレスポンスを一か所で仕上げる。
//!
//! - [`ErrorReport`] が添付されたレスポンスを method / path / status 付きでログに出す
//! - 本番以外では `stack` をレスポンス本体に追加する
//! - panic は [`handle_panic`] で 500 の封筒に変換する（`CatchPanicLayer` に渡す）

use std::any::Any;

use axum::{
    Json,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    config::Environment,
    error::{CoreError, ErrorReport},
};

/// エラーレスポンスをログに出し、必要なら `stack` を付与する
pub async fn handle_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), ToString::to_string);

    let mut response = next.run(request).await;
    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    let status = report.status.as_u16();
    if report.status.is_server_error() {
        tracing::error!(
            %method,
            %path,
            status,
            detail = %report.detail,
            "[ERROR] {} {}: {}",
            method,
            path,
            report.message
        );
    } else {
        tracing::warn!(
            %method,
            %path,
            status,
            "[ERROR] {} {}: {}",
            method,
            path,
            report.message
        );
    }

    if environment.is_production() {
        return response;
    }
    let Some(stack) = report.stack.clone() else {
        return response;
    };

    // ステータスとヘッダー（CORS 等）は元のレスポンスのまま、本体だけ差し替える
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let (_, body) = Json(report.envelope().with_stack(stack))
        .into_response()
        .into_parts();
    Response::from_parts(parts, body)
}

/// panic を 500 のエラーレスポンスに変換する
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    CoreError::Internal(format!("panic: {message}")).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    async fn fail() -> CoreError {
        CoreError::Internal("disk on fire".to_string())
    }

    async fn panics() -> &'static str {
        panic!("handler exploded")
    }

    async fn not_found() -> CoreError {
        CoreError::RouteNotFound {
            method: Method::GET,
            path:   "/gone".to_string(),
        }
    }

    fn test_app(environment: Environment) -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route("/fail", get(fail))
            .route("/panic", get(panics))
            .route("/gone", get(not_found))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(from_fn_with_state(environment, handle_errors))
    }

    async fn call(environment: Environment, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = test_app(environment)
            .oneshot(http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_正常なレスポンスはそのまま返す() {
        let response = test_app(Environment::Development)
            .oneshot(http::Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"fine");
    }

    #[rstest]
    #[case(Environment::Development)]
    #[case(Environment::Test)]
    #[tokio::test]
    async fn test_本番以外では内部エラーにstackが付く(#[case] environment: Environment) {
        let (status, json) = call(environment, "/fail").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], "error");
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "Internal Server Error");
        assert!(json["stack"].as_str().unwrap().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_本番ではstackを出さない() {
        let (status, json) = call(Environment::Production, "/fail").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            serde_json::json!({
                "status": "error",
                "statusCode": 500,
                "message": "Internal Server Error"
            })
        );
    }

    #[tokio::test]
    async fn test_panicは500の封筒になる() {
        let (status, json) = call(Environment::Development, "/panic").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Internal Server Error");
        assert!(json["stack"].as_str().unwrap().contains("handler exploded"));
    }

    #[tokio::test]
    async fn test_404にも本番以外ではstackが付く() {
        let (status, json) = call(Environment::Development, "/gone").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Route not found: GET /gone");
        assert!(json.get("stack").is_some());
    }
}
