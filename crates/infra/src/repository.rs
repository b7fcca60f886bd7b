//! # リポジトリ実装
//!
//! ドメイン層のエンティティを永続化層から取得するリポジトリを提供する。
//!
//! ## 設計方針
//!
//! - **トレイトによる抽象化**: ユースケース層はトレイトにのみ依存し、テストではモックに差し替える
//! - **単一のクエリ実行口**: SQL はすべて [`Database::query`](crate::db::Database::query) を通す

pub mod user_repository;

pub use user_repository::{PostgresUserRepository, UserRepository};
