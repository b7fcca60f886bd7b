//! # リクエスト検証
//!
//! ルートごとの入力契約を宣言し、パス・クエリ・JSON ボディを
//! 「検証済みの値」に変換して受け取るための extractor を提供する。
//!
//! ## 流れ
//!
//! ```text
//! 生の入力 ──deserialize──▶ Raw ──validator──▶ Raw（形式 OK）──parse──▶ 契約型
//! ```
//!
//! いずれかの段階で失敗すると、400 `Validation failed` と
//! フィールドごとの `errors` を返す。この 400 は中央のエラーハンドラを通らない。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! async fn handler(ValidPath(params): ValidPath<UserIdParams>) -> impl IntoResponse {
//!     // params.id は検証済みの UserId
//! }
//! ```

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use qatoto_shared::{ErrorEnvelope, FieldIssue};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// ルートの入力契約
///
/// `Raw` は外部から届く形そのまま、`Self` は検証後の型。
pub trait RequestContract: Sized + Send {
    type Raw: DeserializeOwned + Validate + Send;

    /// 形式チェック済みの `Raw` をドメインの型に変換する
    fn parse(raw: Self::Raw) -> Result<Self, Vec<FieldIssue>>;
}

/// 検証失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRejection {
    pub issues: Vec<FieldIssue>,
}

impl ValidationRejection {
    fn single(path: &str, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(path, message)],
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        tracing::debug!(issues = ?self.issues, "リクエストの検証に失敗しました");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::validation_failed(self.issues)),
        )
            .into_response()
    }
}

/// `validator` のエラーをフィールドパス順の [`FieldIssue`] に変換する
fn field_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("invalid value ({})", error.code), ToString::to_string);
                FieldIssue::new(field.to_string(), message)
            })
        })
        .collect();
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

fn validate_and_parse<T: RequestContract>(raw: T::Raw) -> Result<T, ValidationRejection> {
    raw.validate().map_err(|e| ValidationRejection {
        issues: field_issues(&e),
    })?;
    T::parse(raw).map_err(|issues| ValidationRejection { issues })
}

/// 検証済みのパスパラメータ
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: RequestContract,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<T::Raw>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationRejection::single("params", rejection.body_text()))?;
        validate_and_parse(raw).map(Self)
    }
}

/// 検証済みのクエリパラメータ
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: RequestContract,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<T::Raw>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationRejection::single("query", rejection.body_text()))?;
        validate_and_parse(raw).map(Self)
    }
}

/// 検証済みの JSON ボディ
///
/// ボディが上限を超えた場合は検証失敗ではなく 413 とする。
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: RequestContract,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T::Raw>::from_request(request, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    CoreError::PayloadTooLarge.into_response()
                } else {
                    ValidationRejection::single("body", rejection.body_text()).into_response()
                }
            })?;
        validate_and_parse(raw)
            .map(Self)
            .map_err(IntoResponse::into_response)
    }
}
