use axum::{body::Bytes, extract::FromRequest};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// `axum::Json` whose rejections use the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Body that clients may omit entirely; an empty body reads as `T::default()`.
pub fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::validation(format!("invalid JSON body: {err}")))
}
