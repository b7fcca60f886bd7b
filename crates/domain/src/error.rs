//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成時に検出されるルール違反を表現する。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がドメインのルールに違反している場合に使用する。
    #[error("{0}")]
    Validation(String),
}
