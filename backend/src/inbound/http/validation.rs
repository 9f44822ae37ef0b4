//! Extractor error handlers keeping every failure in the standard envelope.
//!
//! Actix's default extractor errors are plain-text 400s; these handlers
//! rewrap them as [`ApiError`] so malformed bodies, paths, and query
//! strings fail the same way domain validation does.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};

use super::error::ApiError;

pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::invalid_request(format!("invalid request body: {err}")).into()
}

pub(crate) fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::invalid_request(format!("invalid path parameter: {err}")).into()
}

pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::invalid_request(format!("invalid query string: {err}")).into()
}
