//! # アプリケーション状態
//!
//! ハンドラとミドルウェアが共有する読み取り専用の状態。

use std::{sync::Arc, time::Instant};

use axum::http::HeaderValue;

use crate::{config::Environment, usecase::UserUseCaseImpl};

/// ルーター全体で共有する状態
///
/// フィールドはすべて `Arc` か `Copy` のため、`clone` は安価。
#[derive(Clone)]
pub struct AppState {
    pub users:           Arc<UserUseCaseImpl>,
    pub environment:     Environment,
    /// CORS で許可するオリジン
    pub frontend_origin: HeaderValue,
    /// プロセス起動時刻（`/health` の稼働時間の起点）
    pub started_at:      Instant,
}

impl AppState {
    pub fn new(
        users: Arc<UserUseCaseImpl>,
        environment: Environment,
        frontend_origin: HeaderValue,
    ) -> Self {
        Self {
            users,
            environment,
            frontend_origin,
            started_at: Instant::now(),
        }
    }
}
