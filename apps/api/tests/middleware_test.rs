//! # ミドルウェアの結合テスト
//!
//! `build_app` のレイヤー構成全体を通して、横断的なヘッダーと制限を検証する。
//!
//! - `x-request-id` の付与と引き継ぎ
//! - セキュリティヘッダー
//! - CORS（許可オリジンのみ、Cookie 付き）
//! - ボディサイズ上限

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{FRONTEND_ORIGIN, default_app, get, send};
use pretty_assertions::assert_eq;
use rstest::rstest;

const SECURITY_HEADER_NAMES: [&str; 12] = [
    "content-security-policy",
    "cross-origin-opener-policy",
    "cross-origin-resource-policy",
    "origin-agent-cluster",
    "referrer-policy",
    "strict-transport-security",
    "x-content-type-options",
    "x-dns-prefetch-control",
    "x-download-options",
    "x-frame-options",
    "x-permitted-cross-domain-policies",
    "x-xss-protection",
];

// ===== Request ID =====

#[rstest]
#[case("/")]
#[case("/health")]
#[case("/nope")]
#[tokio::test]
async fn test_レスポンスにx_request_idヘッダーが含まれる(#[case] uri: &str) {
    let response = send(default_app(), get(uri)).await;

    assert!(
        response.headers.contains_key("x-request-id"),
        "レスポンスに x-request-id ヘッダーが含まれること"
    );
}

#[tokio::test]
async fn test_クライアント提供のx_request_idがそのまま返される() {
    let custom_id = "client-provided-request-id-123";
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", custom_id)
        .body(Body::empty())
        .unwrap();

    let response = send(default_app(), request).await;

    assert_eq!(
        response.headers.get("x-request-id").unwrap().to_str().unwrap(),
        custom_id,
        "クライアント提供の Request ID がそのまま返されること"
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn test_空のx_request_idは新しいidに置き換えられる(#[case] blank: &str) {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", blank)
        .body(Body::empty())
        .unwrap();

    let response = send(default_app(), request).await;

    let request_id = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(
        uuid::Uuid::parse_str(request_id).is_ok(),
        "新しい UUID が生成されること: {request_id:?}"
    );
}

#[tokio::test]
async fn test_自動生成のx_request_idがuuid_v4形式である() {
    let response = send(default_app(), get("/")).await;

    let request_id = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    let uuid = uuid::Uuid::parse_str(request_id)
        .unwrap_or_else(|_| panic!("有効な UUID であること: {request_id}"));
    assert_eq!(uuid.get_version(), Some(uuid::Version::Random));
}

// ===== セキュリティヘッダー =====

#[rstest]
#[case("/")]
#[case("/users/999")]
#[case("/nope")]
#[tokio::test]
async fn test_すべてのレスポンスにセキュリティヘッダーが付く(#[case] uri: &str) {
    let response = send(default_app(), get(uri)).await;

    for name in SECURITY_HEADER_NAMES {
        assert!(response.headers.contains_key(name), "{name} が含まれること");
    }
    assert_eq!(response.headers.get("x-xss-protection").unwrap(), "0");
    assert!(!response.headers.contains_key("x-powered-by"));
}

// ===== CORS =====

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/users")
        .header("origin", origin)
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_許可オリジンのプリフライトはcookie付きで許可される() {
    let response = send(default_app(), preflight(FRONTEND_ORIGIN)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        FRONTEND_ORIGIN
    );
    assert_eq!(
        response.headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
    assert_eq!(
        response.headers.get("access-control-allow-headers").unwrap(),
        "content-type"
    );
}

#[tokio::test]
async fn test_他のオリジンにはallow_originを返さない() {
    let response = send(default_app(), preflight("https://evil.example.com")).await;

    assert!(!response.headers.contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_許可オリジンからの通常リクエストにもallow_originが付く() {
    let request = Request::builder()
        .uri("/")
        .header("origin", FRONTEND_ORIGIN)
        .body(Body::empty())
        .unwrap();

    let response = send(default_app(), request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        FRONTEND_ORIGIN
    );
}

// ===== ボディサイズ上限 =====

fn post_with_body(size: usize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .header("content-length", size.to_string())
        .body(Body::from(vec![b'a'; size]))
        .unwrap()
}

#[tokio::test]
async fn test_10kbを超えるボディは413になる() {
    let response = send(default_app(), post_with_body(10 * 1024 + 1)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json["status"], "error");
    assert_eq!(response.json["statusCode"], 413);
    assert_eq!(response.json["message"], "request entity too large");
}

#[tokio::test]
async fn test_10kbちょうどのボディは上限に掛からない() {
    let response = send(default_app(), post_with_body(10 * 1024)).await;

    // POST /users は定義されていないため、上限を通過してルーティングまで届く
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json["message"], "Route not found: POST /users");
}

/// 長さを宣言しない（サイズヒントが不明な）ストリーミングボディ
fn streaming_get(total: usize) -> Request<Body> {
    let chunks = vec![vec![b'a'; 1024]; total / 1024]
        .into_iter()
        .map(Ok::<_, std::io::Error>);
    Request::builder()
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .unwrap()
}

#[tokio::test]
async fn test_長さ不明のボディも10kbを超えればハンドラに届く前に413になる() {
    let response = send(default_app(), streaming_get(20 * 1024)).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json["message"], "request entity too large");
}

#[tokio::test]
async fn test_長さ不明のボディでも上限内ならハンドラに届く() {
    let response = send(default_app(), streaming_get(2 * 1024)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["message"], "Users retrieved successfully");
}
