//! Extractors whose rejections use the `{error, code}` envelope instead of axum's plain text.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// JSON body. Malformed JSON, a wrong content type, or a field of the wrong type is a
/// 400 `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters, e.g. a conversation id that is not a UUID.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
