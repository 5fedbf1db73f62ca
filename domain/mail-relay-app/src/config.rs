use std::fmt;

use thiserror::Error;

use crate::{
    domain::address::is_valid_email,
    ports::mail::{RelayAddress, SmtpCredentials},
};

pub const SENDER_EMAIL_VAR: &str = "SENDER_EMAIL";
pub const EMAIL_PASSWORD_VAR: &str = "EMAIL_PASSWORD";
pub const SMTP_SERVER_VAR: &str = "SMTP_SERVER";
pub const SMTP_PORT_VAR: &str = "SMTP_PORT";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("sender email address '{0}' is not valid")]
    InvalidSenderEmail(String),

    #[error("SMTP port '{0}' is not a valid port number")]
    InvalidPort(String),
}

/// Relay settings, loaded once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct MailerConfig {
    sender_email: String,
    password: String,
    smtp_server: String,
    smtp_port: u16,
}

impl MailerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count
    /// as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let sender_email = require(SENDER_EMAIL_VAR)?;
        let password = require(EMAIL_PASSWORD_VAR)?;
        let smtp_server = require(SMTP_SERVER_VAR)?;
        let smtp_port = require(SMTP_PORT_VAR)?;

        if !is_valid_email(&sender_email) {
            return Err(ConfigError::InvalidSenderEmail(sender_email));
        }

        let smtp_port = smtp_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(smtp_port.clone()))?;

        Ok(Self {
            sender_email,
            password,
            smtp_server,
            smtp_port,
        })
    }

    pub fn sender_email(&self) -> &str {
        &self.sender_email
    }

    pub fn relay_address(&self) -> RelayAddress {
        RelayAddress {
            host: self.smtp_server.clone(),
            port: self.smtp_port,
        }
    }

    pub fn credentials(&self) -> SmtpCredentials {
        SmtpCredentials {
            username: self.sender_email.clone(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerConfig")
            .field("sender_email", &self.sender_email)
            .field("password", &"<redacted>")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_env() -> HashMap<String, String> {
        env(&[
            (SENDER_EMAIL_VAR, "sender@example.com"),
            (EMAIL_PASSWORD_VAR, "hunter2"),
            (SMTP_SERVER_VAR, "smtp.example.com"),
            (SMTP_PORT_VAR, "587"),
        ])
    }

    #[test]
    fn test_loads_complete_config() {
        let vars = complete_env();
        let config = MailerConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.sender_email(), "sender@example.com");
        assert_eq!(config.relay_address().to_string(), "smtp.example.com:587");
        assert_eq!(
            config.credentials(),
            SmtpCredentials {
                username: "sender@example.com".to_string(),
                password: "hunter2".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_or_empty_vars_are_rejected() {
        for key in [
            SENDER_EMAIL_VAR,
            EMAIL_PASSWORD_VAR,
            SMTP_SERVER_VAR,
            SMTP_PORT_VAR,
        ] {
            let mut vars = complete_env();
            vars.remove(key);
            assert_eq!(
                MailerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err(),
                ConfigError::MissingVar(key)
            );

            vars.insert(key.to_string(), String::new());
            assert_eq!(
                MailerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err(),
                ConfigError::MissingVar(key)
            );
        }
    }

    #[test]
    fn test_invalid_sender_is_rejected() {
        let mut vars = complete_env();
        vars.insert(SENDER_EMAIL_VAR.to_string(), "not-an-email".to_string());
        assert_eq!(
            MailerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err(),
            ConfigError::InvalidSenderEmail("not-an-email".to_string())
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut vars = complete_env();
        vars.insert(SMTP_PORT_VAR.to_string(), "smtp".to_string());
        assert_eq!(
            MailerConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err(),
            ConfigError::InvalidPort("smtp".to_string())
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let vars = complete_env();
        let config = MailerConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("smtp.example.com"));
    }
}
