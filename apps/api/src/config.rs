//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込み、起動時に一度だけ検証する。
//!
//! ## 設計方針
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! すべての設定を環境変数から読み込む。
//!
//! - 不正な値は最初の 1 件で止めず、すべての変数を検証してからまとめて報告する
//! - 解析ロジックは [`AppConfig::from_lookup`] に集約し、テストでは
//!   プロセスの環境変数を書き換えずに任意の値を渡す
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `8000` | ポート番号 |
//! | `NODE_ENV` | No | `development` | 実行環境（development/production/test） |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `BETTER_AUTH_SECRET` | **Yes** | - | 認証用シークレット（16 文字以上） |
//! | `FRONTEND_URL` | **Yes** | - | フロントエンドの URL（CORS の許可オリジン、http / https のみ） |
//! | `DB_MAX_CONNECTIONS` | No | `20` | 接続プールの最大接続数 |
//! | `DB_IDLE_TIMEOUT_SECS` | No | `30` | アイドル接続を閉じるまでの秒数 |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | No | `5` | 接続取得のタイムアウト秒数 |
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use qatoto_api::config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//!
//! println!("サーバー: {}:{}", config.host, config.port);
//! ```

use std::{fmt, str::FromStr, time::Duration};

use derive_more::Display;
use qatoto_infra::db::PoolSettings;
use strum::{AsRefStr, EnumString};
use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// 認証シークレットの最小文字数
pub const AUTH_SECRET_MIN_LENGTH: usize = 16;

/// 実行環境
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// 認証シークレット
///
/// 現在どのルートからも参照されないが、起動時に形式だけ検証する。
/// `Debug` では値を伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSecret(String);

impl AuthSecret {
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.chars().count() < AUTH_SECRET_MIN_LENGTH {
            return Err(format!(
                "must be at least {AUTH_SECRET_MIN_LENGTH} characters"
            ));
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSecret(***)")
    }
}

/// 不正な環境変数 1 件
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{variable}: {reason}")]
pub struct ConfigIssue {
    pub variable: &'static str,
    pub reason:   String,
}

/// 設定読み込みエラー
///
/// 問題のあった環境変数をすべて保持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("環境変数の設定が不正です: {}", join_issues(.issues))]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// アプリケーション全体の設定
///
/// 起動時に一度だけ構築し、以降は読み取り専用で共有する。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// 実行環境
    pub environment:  Environment,
    /// PostgreSQL 接続 URL
    pub database_url: Url,
    /// 認証シークレット
    pub auth_secret:  AuthSecret,
    /// フロントエンドの URL
    pub frontend_url: Url,
    /// 接続プールの設定
    pub pool:         PoolSettings,
}

impl AppConfig {
    /// プロセスの環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 前後の空白は除去し、空文字列の値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut reader = EnvReader {
            lookup,
            issues: Vec::new(),
        };

        let host = reader
            .value("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = reader.optional("PORT", DEFAULT_PORT, parse_port);
        let environment = reader.optional("NODE_ENV", Environment::default(), parse_environment);
        let database_url = reader.required("DATABASE_URL", parse_url);
        let auth_secret = reader.required("BETTER_AUTH_SECRET", parse_auth_secret);
        let frontend_url = reader.required("FRONTEND_URL", parse_http_url);

        let defaults = PoolSettings::default();
        let max_connections =
            reader.optional("DB_MAX_CONNECTIONS", defaults.max_connections, parse_positive);
        let idle_timeout =
            reader.optional("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout, parse_seconds);
        let acquire_timeout =
            reader.optional("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout, parse_seconds);

        match (
            port,
            environment,
            database_url,
            auth_secret,
            frontend_url,
            max_connections,
            idle_timeout,
            acquire_timeout,
        ) {
            (
                Some(port),
                Some(environment),
                Some(database_url),
                Some(auth_secret),
                Some(frontend_url),
                Some(max_connections),
                Some(idle_timeout),
                Some(acquire_timeout),
            ) if reader.issues.is_empty() => Ok(Self {
                host,
                port,
                environment,
                database_url,
                auth_secret,
                frontend_url,
                pool: PoolSettings {
                    max_connections,
                    idle_timeout,
                    acquire_timeout,
                },
            }),
            _ => Err(ConfigError {
                issues: reader.issues,
            }),
        }
    }

    /// CORS で許可するオリジン（例: `http://localhost:3000`）
    pub fn frontend_origin(&self) -> String {
        self.frontend_url.origin().ascii_serialization()
    }
}

/// 環境変数を読みながら問題を蓄積する
struct EnvReader<F> {
    lookup: F,
    issues: Vec<ConfigIssue>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn value(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    fn optional<T>(
        &mut self,
        name: &'static str,
        default: T,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Option<T> {
        match self.value(name) {
            Some(raw) => self.record(name, parse(raw.trim())),
            None => Some(default),
        }
    }

    fn required<T>(
        &mut self,
        name: &'static str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Option<T> {
        match self.value(name) {
            Some(raw) => self.record(name, parse(raw.trim())),
            None => self.record(name, Err("is required".to_string())),
        }
    }

    fn record<T>(&mut self, variable: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(reason) => {
                self.issues.push(ConfigIssue { variable, reason });
                None
            }
        }
    }
}

fn parse_port(raw: &str) -> Result<u16, String> {
    raw.parse()
        .map_err(|_| format!("must be a port number between 0 and 65535, got {raw:?}"))
}

fn parse_environment(raw: &str) -> Result<Environment, String> {
    Environment::from_str(raw)
        .map_err(|_| format!("must be one of development, production, test, got {raw:?}"))
}

fn parse_auth_secret(raw: &str) -> Result<AuthSecret, String> {
    AuthSecret::new(raw)
}

fn parse_url(raw: &str) -> Result<Url, String> {
    Url::parse(raw).map_err(|e| format!("must be a valid URL ({e})"))
}

/// CORS の許可オリジンになる URL
///
/// `file:` などはオリジンが `null` になるため、http / https のみ受け付ける。
fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = parse_url(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("must be an http or https URL, got scheme {scheme:?}")),
    }
}

fn parse_positive(raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("must be a positive integer, got {raw:?}")),
        Ok(n) => Ok(n),
    }
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| format!("must be a non-negative number of seconds, got {raw:?}"))
}
