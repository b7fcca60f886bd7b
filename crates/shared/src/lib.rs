//! # QAToto 共有ユーティリティ
//!
//! このクレートは、QAToto プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, api）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は api クレートの責務）

pub mod api_response;
pub mod error_response;
pub mod health;
pub mod observability;
pub mod paginated_response;

pub use api_response::{ApiResponse, ResponseStatus};
pub use error_response::{ErrorEnvelope, FieldIssue};
pub use health::HealthResponse;
pub use paginated_response::{PaginatedResponse, PaginationMeta};
