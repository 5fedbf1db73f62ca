use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAddress {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for RelayAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid envelope: {0}")]
    Envelope(String),

    #[error("relay connection failed: {0}")]
    Connection(String),

    #[error("relay rejected the submission: {0}")]
    Rejected(String),
}

/// A single submission to an SMTP relay.
///
/// Every call opens, authenticates and closes its own session; retrying is
/// left to the caller.
#[async_trait::async_trait]
pub trait MailTransport {
    async fn send(
        &self,
        relay: &RelayAddress,
        credentials: &SmtpCredentials,
        sender: &str,
        recipients: &[String],
        message: &[u8],
    ) -> Result<(), TransportError>;
}
