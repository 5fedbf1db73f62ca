use std::{sync::Arc, time::Duration};

use log::{error, info, warn};
use thiserror::Error;

use crate::{
    config::MailerConfig,
    domain::{
        address::is_valid_email,
        message::{EmailRequest, format_message},
        retry::{RetryPolicy, RetryState},
    },
    ports::mail::{MailTransport, TransportError},
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendEmailError {
    #[error("Recipient email address '{address}' is not valid")]
    Validation { address: String },

    #[error("delivery failed after {attempts} attempts: {last_error}")]
    Delivery {
        attempts: u32,
        last_error: TransportError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Delivered,
    Failed(TransportError),
}

/// One call to the transport. `waited` is the backoff slept before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAttempt {
    pub attempt: u32,
    pub waited: Duration,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub attempts: Vec<DeliveryAttempt>,
}

#[async_trait::async_trait]
pub trait SendEmailUseCase {
    async fn send_email(&self, request: EmailRequest) -> Result<DeliveryReport, SendEmailError>;
}

pub struct SendEmailUseCaseImpl<T: MailTransport> {
    config: Arc<MailerConfig>,
    mail_transport: Arc<T>,
    retry_policy: RetryPolicy,
}

impl<T> SendEmailUseCaseImpl<T>
where
    T: MailTransport + Send + Sync + 'static,
{
    pub fn new(
        config: Arc<MailerConfig>,
        mail_transport: Arc<T>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            config,
            mail_transport,
            retry_policy,
        }
    }
}

#[async_trait::async_trait]
impl<T> SendEmailUseCase for SendEmailUseCaseImpl<T>
where
    T: MailTransport + Send + Sync + 'static,
{
    async fn send_email(&self, request: EmailRequest) -> Result<DeliveryReport, SendEmailError> {
        if let Some(invalid) = request
            .recipients
            .iter()
            .find(|recipient| !is_valid_email(recipient))
        {
            return Err(SendEmailError::Validation {
                address: invalid.clone(),
            });
        }

        let message = format_message(&request.recipients, &request.subject, &request.message);
        let relay = self.config.relay_address();
        let credentials = self.config.credentials();

        let mut attempts = Vec::new();
        let mut waited = Duration::ZERO;
        let mut state = self.retry_policy.start();

        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    let result = self
                        .mail_transport
                        .send(
                            &relay,
                            &credentials,
                            self.config.sender_email(),
                            &request.recipients,
                            &message,
                        )
                        .await;
                    match result {
                        Ok(()) => {
                            attempts.push(DeliveryAttempt {
                                attempt,
                                waited,
                                outcome: AttemptOutcome::Delivered,
                            });
                            state.on_success()
                        }
                        Err(e) => {
                            attempts.push(DeliveryAttempt {
                                attempt,
                                waited,
                                outcome: AttemptOutcome::Failed(e.clone()),
                            });
                            state.on_failure(&self.retry_policy, e)
                        }
                    }
                }
                RetryState::Backoff {
                    attempt,
                    wait,
                    ref error,
                } => {
                    warn!(
                        "Attempt {} failed, retrying in {:?}: {}",
                        attempt, wait, error
                    );
                    tokio::time::sleep(wait).await;
                    waited = wait;
                    state.after_backoff()
                }
                RetryState::Success { attempt } => {
                    info!(
                        "Email to {} recipient(s) delivered via {} on attempt {}",
                        request.recipients.len(),
                        relay,
                        attempt
                    );
                    return Ok(DeliveryReport { attempts });
                }
                RetryState::Exhausted {
                    attempts: attempt_count,
                    last_error,
                } => {
                    error!(
                        "Giving up on delivery via {} after {} attempts: {}",
                        relay, attempt_count, last_error
                    );
                    return Err(SendEmailError::Delivery {
                        attempts: attempt_count,
                        last_error,
                    });
                }
            };
        }
    }
}
