//! SMTP email notifier via `lettre` with TLS support.
//!
//! Delivers an alert as one MIME message: an HTML body with a Markdown
//! plain-text alternative, plus one attachment per file component. Every
//! send opens its own SMTP session and closes it afterwards, failed or not.

use alert_core::{AlertMessage, EmailDestination, SmtpSecurity};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::assemble;
use crate::traits::{Notifier, NotifyError};

/// Sends alerts as emails via SMTP.
#[derive(Debug)]
pub struct EmailNotifier {
    /// Async SMTP transport for sending emails.
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Sender mailbox.
    from: Mailbox,
    /// Recipient mailboxes.
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` for one email destination.
    ///
    /// The sender address doubles as the SMTP username when a password is
    /// set; without one the connection is unauthenticated.
    pub fn from_destination(dest: &EmailDestination) -> Result<Self, NotifyError> {
        let from_mailbox: Mailbox = dest
            .sender
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;

        let to_mailboxes: Vec<Mailbox> = dest
            .recipients
            .iter()
            .map(|addr| {
                addr.parse()
                    .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if to_mailboxes.is_empty() {
            return Err(NotifyError::Config(
                "at least one recipient is required".to_string(),
            ));
        }

        let host = dest.smtp_host.as_str();
        let mut builder = match dest.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| NotifyError::Config(e.to_string()))?,
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| NotifyError::Config(e.to_string()))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        }
        .port(dest.smtp_port);

        if let Some(password) = &dest.password {
            builder = builder.credentials(Credentials::new(
                from_mailbox.email.to_string(),
                password.expose().to_string(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: from_mailbox,
            to: to_mailboxes,
        })
    }

    /// Build the MIME message for an alert without sending it.
    pub fn build_message(&self, message: &AlertMessage) -> Result<Message, NotifyError> {
        let html = assemble::html_document(message)?;
        let plain = assemble::markdown_document(message);
        let body = MultiPart::alternative_plain_html(plain, html);

        let mut message_builder = Message::builder().from(self.from.clone());
        for recipient in &self.to {
            message_builder = message_builder.to(recipient.clone());
        }
        let message_builder = message_builder.subject(message.subject());

        let mut files = message.files().peekable();
        let email = if files.peek().is_none() {
            message_builder.multipart(body)
        } else {
            let mut mixed = MultiPart::mixed().multipart(body);
            for file in files {
                let content_type = ContentType::parse(file.mime_type())
                    .or_else(|_| ContentType::parse("application/octet-stream"))
                    .map_err(|e| NotifyError::Render(e.to_string()))?;
                mixed = mixed.singlepart(
                    Attachment::new(file.name().to_string())
                        .body(file.bytes().to_vec(), content_type),
                );
            }
            message_builder.multipart(mixed)
        };

        email.map_err(|e| NotifyError::Smtp(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    /// Send the alert email to all configured recipients.
    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        let email = self.build_message(message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::info!(
            channel = "email",
            subject = %message.subject(),
            recipients = self.to.len(),
            "alert delivered"
        );

        Ok(())
    }

    /// Returns `"email"`.
    fn channel_name(&self) -> &str {
        "email"
    }

    fn target(&self) -> String {
        self.to
            .iter()
            .map(|m| m.email.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_core::{Component, File, Secret, Table, Text};

    fn destination(recipients: &[&str]) -> EmailDestination {
        EmailDestination::new(
            "Alerts <alerts@example.com>",
            Some(Secret::new("app-password")),
            recipients.iter().copied(),
        )
    }

    fn formatted(notifier: &EmailNotifier, message: &AlertMessage) -> String {
        String::from_utf8(notifier.build_message(message).unwrap().formatted()).unwrap()
    }

    #[test]
    fn from_destination_valid() {
        let notifier = EmailNotifier::from_destination(&destination(&["admin@example.com"]));
        assert!(notifier.is_ok());
    }

    #[test]
    fn invalid_sender_rejected() {
        let mut dest = destination(&["admin@example.com"]);
        dest.sender = "bad-address".to_string();
        let err = EmailNotifier::from_destination(&dest).unwrap_err().to_string();
        assert!(err.contains("Configuration error"), "got: {err}");
    }

    #[test]
    fn invalid_recipient_rejected() {
        let result = EmailNotifier::from_destination(&destination(&["not-valid"]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_recipients_rejected() {
        let err = EmailNotifier::from_destination(&destination(&[]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("at least one recipient"), "got: {err}");
    }

    #[test]
    fn every_security_mode_builds() {
        for (port, security) in [
            (465, SmtpSecurity::Tls),
            (587, SmtpSecurity::StartTls),
            (25, SmtpSecurity::None),
        ] {
            let dest = destination(&["admin@example.com"])
                .with_relay("smtp.example.com", port, security);
            assert!(EmailNotifier::from_destination(&dest).is_ok(), "{security:?}");
        }
    }

    #[test]
    fn all_recipients_are_direct_addressees() {
        let dest = destination(&["a@example.com", "b@example.com"]);
        let notifier = EmailNotifier::from_destination(&dest).unwrap();
        let msg = AlertMessage::new("Disk alert", ["disk is full"]).unwrap();
        let raw = formatted(&notifier, &msg);

        let to_line = raw.lines().find(|l| l.starts_with("To:")).unwrap();
        assert!(to_line.contains("a@example.com") && to_line.contains("b@example.com"));
        assert!(raw.contains("Subject: Disk alert"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(!raw.contains("multipart/mixed"));
        assert_eq!(notifier.target(), "a@example.com, b@example.com");
    }

    #[test]
    fn files_become_attachments() {
        let notifier = EmailNotifier::from_destination(&destination(&["a@example.com"])).unwrap();
        let table = Table::new(vec![vec![("host", "db-1")]]).unwrap();
        let msg = AlertMessage::new(
            "Report",
            vec![
                Component::from(Text::new("see attached")),
                File::from_bytes("report.json", b"{}".to_vec()).unwrap().into(),
                File::from_bytes("events.log", b"{}".to_vec())
                    .unwrap()
                    .with_mime_type("application/x-ndjson")
                    .into(),
                table.to_csv_file().unwrap().into(),
            ],
        )
        .unwrap();
        let raw = formatted(&notifier, &msg);

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("report.json"));
        assert!(raw.contains("application/json"));
        assert!(raw.contains("text/csv"));
        assert!(raw.contains("application/x-ndjson"));
    }

    #[tokio::test]
    async fn unreachable_relay_is_smtp_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let dest = EmailDestination::new("alerts@example.com", None, ["a@example.com"])
            .with_relay("127.0.0.1", port, SmtpSecurity::None);
        let notifier = EmailNotifier::from_destination(&dest).unwrap();
        let msg = AlertMessage::new("s", ["body"]).unwrap();

        let err = notifier.send(&msg).await.unwrap_err();
        assert!(matches!(err, NotifyError::Smtp(_)), "got: {err:?}");
    }

    #[test]
    fn channel_name_is_email() {
        let notifier = EmailNotifier::from_destination(&destination(&["a@example.com"])).unwrap();
        assert_eq!(notifier.channel_name(), "email");
    }
}
