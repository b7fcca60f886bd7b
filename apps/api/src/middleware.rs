//! # ミドルウェア
//!
//! 全リクエストに適用する横断的な処理を提供する。
//! 適用順序は [`build_app`](crate::app_builder::build_app) を参照。

mod body_limit;
mod cookies;
mod error_handler;
mod not_found;
mod request_id;
mod request_log;
mod security_headers;

pub use body_limit::{BODY_LIMIT_BYTES, limit_body};
pub use cookies::parse_cookies;
pub use error_handler::{handle_errors, handle_panic};
pub use not_found::route_not_found;
pub use request_id::discard_blank_request_id;
pub use request_log::log_request;
pub use security_headers::security_headers;
