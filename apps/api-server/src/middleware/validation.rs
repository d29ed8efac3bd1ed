//! Request validation - runs the DTO rules before a handler sees the body.

use std::future::{Future, Ready, ready};
use std::ops::Deref;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use quill_shared::validation::{Normalize, field_errors};

use crate::middleware::error::AppError;

/// JSON body that has been normalized and passed its validation rules.
///
/// Fails with a 400 listing every violated field; the handler is not invoked.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Normalize + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let mut body = json.await?.into_inner();
            body.normalize();

            body.validate()
                .map_err(|errors| AppError::Validation(field_errors(&errors)))?;

            Ok(ValidatedJson(body))
        })
    }
}

/// Parse a path identifier, rejecting anything that is not a UUID.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::field("id", "Invalid ID format"))
}

/// The `{id}` path segment, parsed as a UUID.
///
/// Extracted ahead of the body so a malformed id is reported before body rules run.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub Uuid);

impl FromRequest for PathId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(parse_id(raw).map(PathId))
    }
}
