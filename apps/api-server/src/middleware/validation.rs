//! Request body validation.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::{AppError, validation_messages};

/// JSON body that has passed its `validator` rules.
///
/// Deserialization failures are reported through the `JsonConfig` error
/// handler; rule violations become [`AppError::Validation`].
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(value) = body.await?;
            value
                .validate()
                .map_err(|e| AppError::Validation(validation_messages(&e)))?;

            Ok(ValidatedJson(value))
        })
    }
}

/// Extractor configs that report malformed input as `VALIDATION_ERROR`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(vec![err.to_string()]).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(vec![err.to_string()]).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::Validation(vec![err.to_string()]).into())
}
