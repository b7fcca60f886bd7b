//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲

pub mod health;
pub mod index;
pub mod user;

pub use health::health_check;
pub use index::welcome;
pub use user::{UserIdParams, get_user, list_users};
