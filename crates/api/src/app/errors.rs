use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use dropfront_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InsufficientInventory => json_error(
            StatusCode::CONFLICT,
            "insufficient_inventory",
            "not enough stock available",
        ),
        DomainError::OrderCommitConflict(msg) => {
            json_error(StatusCode::CONFLICT, "commit_conflict", msg)
        }
        DomainError::VariantNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "variant not found")
        }
        DomainError::ItemNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "cart item not found")
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::CartEmpty => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "cart_empty", "cart is empty")
        }
        DomainError::InvalidDiscount(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_discount", msg)
        }
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
