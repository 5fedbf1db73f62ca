use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use log::debug;
use mail_relay_app::domain::message::EmailRequest;
use serde::de::Error as _;

use crate::{AppState, app::ServiceError};

pub const SUCCESS_MESSAGE: &str = "Email has been sent successfully!";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST Method is allowed.";

/// Absent fields decode as empty values; only unparsable JSON is refused.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct JsonSendEmailRequest {
    subject: String,
    message: String,
    recipients: Vec<String>,
}

impl From<JsonSendEmailRequest> for EmailRequest {
    fn from(value: JsonSendEmailRequest) -> Self {
        EmailRequest {
            subject: value.subject,
            message: value.message,
            recipients: value.recipients,
        }
    }
}

/// Decodes the first JSON value in `body`. Anything after it is ignored.
fn decode_request(body: &[u8]) -> Result<JsonSendEmailRequest, serde_json::Error> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<JsonSendEmailRequest>()
        .next()
        .unwrap_or_else(|| Err(serde_json::Error::custom("EOF")))
}

pub async fn send_email(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    let request = decode_request(&body)?;

    // Delivery runs in its own task so a client hanging up does not cancel
    // the retry loop halfway.
    let use_case = app_state.app.send_email_use_case.clone();
    let report = tokio::spawn(async move { use_case.send_email(request.into()).await })
        .await
        .map_err(|e| ServiceError::Internal(format!("Delivery task failed: {}", e)))??;

    debug!("Delivered after {} attempt(s)", report.attempts.len());
    Ok(([(header::CONTENT_TYPE, "text/plain")], SUCCESS_MESSAGE))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
}
