//! # QAToto API サーバー
//!
//! ウェルカム、ヘルスチェック、ユーザー参照のエンドポイントを提供する HTTP API。
//!
//! ## アーキテクチャ
//!
//! ```text
//! リクエスト → ミドルウェア → handler → usecase → repository（infra）→ PostgreSQL
//! ```
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーターとミドルウェアの構築
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - 横断的なミドルウェア
//! - [`state`] - ハンドラが共有する状態
//! - [`usecase`] - ビジネスロジック
//! - [`validation`] - リクエスト検証の extractor
//!
//! ## 依存関係
//!
//! - `qatoto_domain`: ドメインモデル
//! - `qatoto_infra`: データベース接続、リポジトリ
//! - `qatoto_shared`: レスポンス封筒、トレーシング

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod state;
pub mod usecase;
pub mod validation;
