//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: `UserId` / `Email` は文字列をラップし、型安全性を確保
//! - **列型に依存しない ID**: `users.id` の列型はこのシステムの管理外のため、
//!   ID は文字列表現で保持する
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行
//! - **保存済みの値は検証しない**: `users` テーブルはこのシステムの外で書き込まれる。
//!   DB から読んだ値は `from_stored` でそのまま包み、`email` / `created_at` の NULL も許容する
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use qatoto_domain::user::{Email, User, UserId};
//!
//! let user = User::new(
//!     UserId::new("42")?,
//!     Email::new("user@example.com")?,
//!     chrono::Utc::now(),
//! );
//!
//! assert_eq!(user.id().as_str(), "42");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// ユーザー ID の最大文字数
pub const USER_ID_MAX_LENGTH: usize = 128;

/// メールアドレスの最大文字数
const EMAIL_MAX_LENGTH: usize = 255;

/// ユーザー ID（一意識別子）
///
/// `users.id` 列の文字列表現。整数・UUID・文字列のいずれの列型でも
/// 同じ型で扱えるよう、DB 側で `id::text` にキャストして取得する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// ユーザー ID を作成する
    ///
    /// # バリデーション
    ///
    /// - 前後の空白を除いて空文字列ではない
    /// - 最大 128 文字
    /// - 制御文字を含まない
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("id must not be empty".to_string()));
        }

        if value.chars().count() > USER_ID_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "id must be at most {USER_ID_MAX_LENGTH} characters"
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(DomainError::Validation(
                "id must not contain control characters".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// DB に保存済みの ID をそのまま包む
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// メールアドレス（値オブジェクト）
///
/// 生成時に最低限の構造（`local@domain`）を検証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `@` の前後が空ではない
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation("email must not be empty".to_string()));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(format!(
                "email has an invalid format: {value}"
            )));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(format!(
                "email has an invalid format: {value}"
            )));
        }

        if value.chars().count() > EMAIL_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "email must be at most {EMAIL_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    /// DB に保存済みのメールアドレスをそのまま包む
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// ユーザーエンティティ
///
/// `users` テーブルの 1 行に対応する読み取り専用のドメインオブジェクト。
/// JSON のキーは列名（`id`, `email`, `created_at`）と同じで、NULL は `null` になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id:         UserId,
    email:      Option<Email>,
    created_at: Option<DateTime<Utc>>,
}

impl User {
    /// すべての列が揃ったユーザーを組み立てる
    pub fn new(id: UserId, email: Email, created_at: DateTime<Utc>) -> Self {
        Self::from_stored(id, Some(email), Some(created_at))
    }

    /// DB の行をそのまま組み立てる
    pub fn from_stored(
        id: UserId,
        email: Option<Email>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}
