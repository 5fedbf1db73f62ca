#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    pub subject: String,
    pub message: String,
    pub recipients: Vec<String>,
}

/// Renders the message as sent in the DATA phase. Recipients are not
/// validated here.
pub fn format_message(recipients: &[String], subject: &str, body: &str) -> Vec<u8> {
    format!(
        "To: {}\r\nSubject: {}\r\n\r\n{}\r\n",
        recipients.join(","),
        subject,
        body
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let recipients = vec!["a@x.com".to_string(), "b@y.com".to_string()];
        assert_eq!(
            format_message(&recipients, "Hi", "Body"),
            b"To: a@x.com,b@y.com\r\nSubject: Hi\r\n\r\nBody\r\n".to_vec()
        );
    }

    #[test]
    fn test_format_message_keeps_recipient_order() {
        let recipients = vec![
            "z@x.com".to_string(),
            "a@x.com".to_string(),
            "m@x.com".to_string(),
        ];
        let formatted = String::from_utf8(format_message(&recipients, "", "")).unwrap();
        assert!(formatted.starts_with("To: z@x.com,a@x.com,m@x.com\r\n"));
        assert!(formatted.ends_with("Subject: \r\n\r\n\r\n"));
    }
}
