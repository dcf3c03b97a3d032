use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::gateway::GatewayError;

/// Failures of the payment-to-enrollment flow. All are reported
/// synchronously to the caller; none are fatal to the process.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("{0}")]
    Validation(String),
    /// Course absent, or the claimed amount does not match the stored
    /// price. Logged as a potential integrity violation.
    #[error("Invalid course or amount")]
    NotFoundOrMismatch,
    #[error("User not found")]
    UserNotFound,
    #[error("Course already purchased")]
    AlreadyEnrolled,
    /// No pending payment known for the supplied order id, or the pending
    /// record does not match the client-supplied fields.
    #[error("Unknown or mismatched payment")]
    UnknownPayment,
    #[error("PayPal payment failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PaymentError {
    pub fn status(&self) -> StatusCode {
        match self {
            PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
            PaymentError::NotFoundOrMismatch => StatusCode::BAD_REQUEST,
            PaymentError::UserNotFound => StatusCode::NOT_FOUND,
            PaymentError::AlreadyEnrolled => StatusCode::BAD_REQUEST,
            PaymentError::UnknownPayment => StatusCode::NOT_FOUND,
            PaymentError::Gateway(_) => StatusCode::BAD_GATEWAY,
            PaymentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "payment request failed");
        } else {
            tracing::warn!(error = %self, "payment request rejected");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
