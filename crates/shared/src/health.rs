//! # ヘルスチェック共通型
//!
//! `/health` エンドポイントのレスポンス型。
//! 封筒のフィールドに加えて、稼働時間とサーバー時刻を返す。

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::ApiResponse;

/// ヘルスチェックレスポンス
///
/// ## 使用例
///
/// ```
/// use std::time::Duration;
///
/// use qatoto_shared::HealthResponse;
///
/// let response = HealthResponse::new(Duration::from_millis(1500), chrono::Utc::now());
/// assert_eq!(response.uptime, 1.5);
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub envelope:  ApiResponse<()>,
    /// プロセス起動からの経過秒数
    pub uptime:    f64,
    /// ISO-8601（UTC、ミリ秒精度）
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(uptime: Duration, now: DateTime<Utc>) -> Self {
        Self {
            envelope:  ApiResponse::ok("OK"),
            uptime:    uptime.as_secs_f64(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
