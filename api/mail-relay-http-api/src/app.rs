use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use mail_relay_app::workflow::send_email::SendEmailError;
use thiserror::Error;

pub const DELIVERY_FAILED_MESSAGE: &str = "Failed to send an email after multiple attempts.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    SendEmail(#[from] SendEmailError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ServiceError::Decode(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ServiceError::SendEmail(e @ SendEmailError::Validation { .. }) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            // Already logged by the workflow; the caller only gets the generic text.
            ServiceError::SendEmail(SendEmailError::Delivery { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                DELIVERY_FAILED_MESSAGE.to_string(),
            ),
            ServiceError::Internal(msg) => {
                error!("{}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    DELIVERY_FAILED_MESSAGE.to_string(),
                )
            }
        };
        (status, msg).into_response()
    }
}
