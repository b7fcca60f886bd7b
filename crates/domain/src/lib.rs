//! # QAToto ドメイン層
//!
//! API が扱うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 生成時に検証し、不正な値を型で排除する
//! - **読み取り専用**: ユーザーのライフサイクル（作成・削除）はこのシステムの外で管理される
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - ユーザーエンティティと値オブジェクト

pub mod error;
pub mod user;

pub use error::DomainError;
