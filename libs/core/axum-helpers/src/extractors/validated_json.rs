//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Field order used to pick which violation is reported when several fields
/// fail at once.
///
/// List fields as they are declared on the payload. Unlisted fields rank
/// after listed ones, alphabetically.
pub trait FieldOrder {
    const FIELD_ORDER: &'static [&'static str] = &[];
}

/// JSON body that has been deserialized and then validated.
///
/// Deserialization failures and the first validation violation are both
/// rejected as 400 with the validation code, before the handler runs.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(max = 100))]
///     name: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// impl FieldOrder for CreateUser {
///     const FIELD_ORDER: &'static [&'static str] = &["name", "email"];
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.name)
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FieldOrder,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate().map_err(|errors| AppError::OrderedValidation {
            errors,
            order: T::FIELD_ORDER,
        })?;
        Ok(ValidatedJson(data))
    }
}
