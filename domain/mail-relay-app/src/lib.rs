use std::sync::Arc;

use crate::{
    config::MailerConfig,
    domain::retry::RetryPolicy,
    ports::mail::MailTransport,
    workflow::send_email::{SendEmailUseCase, SendEmailUseCaseImpl},
};

pub mod config;
pub mod domain;
pub mod ports;
pub mod workflow;

pub struct Application {
    pub send_email_use_case: Arc<dyn SendEmailUseCase + Send + Sync + 'static>,
}

pub fn build_application<T: MailTransport + Send + Sync + 'static>(
    config: Arc<MailerConfig>,
    mail_transport: Arc<T>,
) -> Application {
    let send_email_use_case = Arc::new(SendEmailUseCaseImpl::new(
        config,
        mail_transport,
        RetryPolicy::default(),
    ));

    Application {
        send_email_use_case,
    }
}
