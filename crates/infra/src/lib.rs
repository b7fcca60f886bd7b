//! # QAToto インフラ層
//!
//! 外部システム（PostgreSQL）との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理と、唯一のクエリ実行口
//! - **プール監視**: 接続プールの死活監視と障害時のエスカレーション
//! - **リポジトリ実装**: ユースケース層が使うリポジトリトレイトの具体実装
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、クエリ実行、プール監視
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use qatoto_infra::{
//!     db::{self, Database, PoolSettings},
//!     repository::PostgresUserRepository,
//! };
//!
//! let pool = db::create_pool("postgres://localhost/qatoto", &PoolSettings::default()).await?;
//! let database = Database::new(pool, true);
//! let users = PostgresUserRepository::new(database);
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
