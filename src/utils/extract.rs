//! Request extractors
//! 
//! `Json`, `Path` and `Query` wrappers whose rejections are rendered by
//! `AppError`, so malformed input gets the same JSON error body as every
//! other failure.

use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::Json;

use crate::utils::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
