use std::net::IpAddr;

use lettre::{
    Address, SmtpTransport, Transport,
    address::Envelope,
    transport::smtp::{
        Error as SmtpError,
        authentication::{Credentials, Mechanism},
        client::{Tls, TlsParameters},
    },
};
use log::debug;
use mail_relay_app::ports::mail::{MailTransport, RelayAddress, SmtpCredentials, TransportError};

/// Submits pre-formatted messages through lettre's blocking SMTP client.
///
/// A fresh transport is built for each submission so no session outlives the
/// call. STARTTLS is mandatory before credentials are sent, except to a
/// loopback relay, where it is only used when offered.
#[derive(Debug, Default, Clone)]
pub struct LettreMailTransport;

impl LettreMailTransport {
    pub fn new() -> Self {
        Self
    }
}

fn build_envelope(sender: &str, recipients: &[String]) -> Result<Envelope, TransportError> {
    let from = sender
        .parse::<Address>()
        .map_err(|e| TransportError::Envelope(format!("Invalid from address: {}", e)))?;
    let to = recipients
        .iter()
        .map(|recipient| {
            recipient.parse::<Address>().map_err(|e| {
                TransportError::Envelope(format!("Invalid to address '{}': {}", recipient, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Envelope::new(Some(from), to).map_err(|e| TransportError::Envelope(e.to_string()))
}

fn map_smtp_error(error: SmtpError) -> TransportError {
    if error.is_permanent() || error.is_transient() {
        TransportError::Rejected(error.to_string())
    } else {
        TransportError::Connection(error.to_string())
    }
}

fn is_loopback(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

fn tls_for_host(host: &str) -> Result<Tls, TransportError> {
    let tls = TlsParameters::new(host.to_string())
        .map_err(|e| TransportError::Connection(format!("Failed to set up TLS: {}", e)))?;
    if is_loopback(host) {
        Ok(Tls::Opportunistic(tls))
    } else {
        Ok(Tls::Required(tls))
    }
}

fn submit(
    relay: &RelayAddress,
    credentials: &SmtpCredentials,
    envelope: &Envelope,
    message: &[u8],
) -> Result<(), TransportError> {
    submit_with_tls(relay, tls_for_host(&relay.host)?, credentials, envelope, message)
}

fn submit_with_tls(
    relay: &RelayAddress,
    tls: Tls,
    credentials: &SmtpCredentials,
    envelope: &Envelope,
    message: &[u8],
) -> Result<(), TransportError> {
    let transport = SmtpTransport::builder_dangerous(&relay.host)
        .port(relay.port)
        .tls(tls)
        .credentials(Credentials::new(
            credentials.username.clone(),
            credentials.password.clone(),
        ))
        .authentication(vec![Mechanism::Plain])
        .build();
    let response = transport.send_raw(envelope, message).map_err(map_smtp_error)?;
    debug!("Relay {} accepted message: {:?}", relay, response.code());
    Ok(())
}

#[async_trait::async_trait]
impl MailTransport for LettreMailTransport {
    async fn send(
        &self,
        relay: &RelayAddress,
        credentials: &SmtpCredentials,
        sender: &str,
        recipients: &[String],
        message: &[u8],
    ) -> Result<(), TransportError> {
        let envelope = build_envelope(sender, recipients)?;
        let relay = relay.clone();
        let credentials = credentials.clone();
        let message = message.to_vec();

        tokio::task::spawn_blocking(move || submit(&relay, &credentials, &envelope, &message))
            .await
            .map_err(|e| TransportError::Connection(format!("SMTP submission task failed: {}", e)))?
    }
}
