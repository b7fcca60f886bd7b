//! テスト共通フィクスチャ
//!
//! `build_app` をモックリポジトリで組み立て、`oneshot` でリクエストを送るためのヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use qatoto_api::{
    app_builder::build_app,
    config::Environment,
    state::AppState,
    usecase::UserUseCaseImpl,
};
use qatoto_domain::user::{Email, User, UserId};
use qatoto_infra::mock::MockUserRepository;
use tower::ServiceExt;

/// テスト用のフロントエンドオリジン
pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// テスト用のユーザーを作成する
pub fn user(id: &str, email: &str) -> User {
    User::new(
        UserId::new(id).unwrap(),
        Email::new(email).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
    )
}

/// モックリポジトリを使ったルーターを構築する
pub fn test_app(repo: &MockUserRepository, environment: Environment) -> Router {
    let state = AppState::new(
        Arc::new(UserUseCaseImpl::new(Arc::new(repo.clone()))),
        environment,
        HeaderValue::from_static(FRONTEND_ORIGIN),
    );
    build_app(state)
}

/// ユーザーなし・開発環境のルーター
pub fn default_app() -> Router {
    test_app(&MockUserRepository::new(), Environment::Development)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// テスト用レスポンス
pub struct TestResponse {
    pub status:  StatusCode,
    pub headers: HeaderMap,
    pub json:    serde_json::Value,
}

/// リクエストを送り、本体を JSON として読む
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    TestResponse {
        status,
        headers,
        json,
    }
}
