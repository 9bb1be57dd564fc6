//! Standardized JSON responses shared by every handler.

use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

use crate::error::StoreError;

fn builder(status: StatusCode) -> lambda_http::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
}

/// Serialize `value` as the response body.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(builder(status)
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn bad_request(detail: &str) -> Result<Response<Body>, Error> {
    json(
        StatusCode::BAD_REQUEST,
        &serde_json::json!({ "error": detail }),
    )
}

pub fn unauthorized() -> Result<Response<Body>, Error> {
    json(
        StatusCode::UNAUTHORIZED,
        &serde_json::json!({ "error": "Missing or invalid credentials" }),
    )
}

pub fn forbidden(detail: &str) -> Result<Response<Body>, Error> {
    json(
        StatusCode::FORBIDDEN,
        &serde_json::json!({ "error": detail }),
    )
}

pub fn not_found(detail: &str) -> Result<Response<Body>, Error> {
    json(
        StatusCode::NOT_FOUND,
        &serde_json::json!({ "error": detail }),
    )
}

pub fn method_not_allowed() -> Result<Response<Body>, Error> {
    json(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({ "error": "Method not allowed" }),
    )
}

/// Map a store error onto the HTTP surface. Server faults are logged in
/// full and answered with a generic body; client faults echo the message.
pub fn store_error(err: &StoreError) -> Result<Response<Body>, Error> {
    if err.is_server_fault() {
        tracing::error!("Store failure: {err}");
        return json(
            err.status_code(),
            &serde_json::json!({ "error": "Internal server error" }),
        );
    }
    json(
        err.status_code(),
        &serde_json::json!({ "error": err.to_string() }),
    )
}

/// CORS preflight response.
pub fn preflight() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS")
        .header(
            "Access-Control-Allow-Headers",
            "Content-Type,Authorization,X-Username",
        )
        .body(Body::Empty)
        .map_err(Box::new)?)
}
