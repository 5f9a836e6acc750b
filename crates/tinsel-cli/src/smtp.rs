//! SMTP delivery.
//!
//! [`SmtpNotifier`] turns each [`Notification`] into a MIME message and hands
//! it to a [`MailTransport`]. Production runs use [`lettre::SmtpTransport`]
//! over implicit TLS; tests substitute a transport that records messages.
//!
//! Transport failures are classified so the delivery policy can decide what
//! to retry: permanent SMTP replies and client-side errors become
//! [`DeliveryError::Rejected`], everything else [`DeliveryError::Io`].

use std::{fmt, io};

use lettre::{
    Address, Message, SmtpTransport, Transport,
    address::AddressError,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::notifier::{DeliveryError, Notification, Notifier, SUBJECT};

/// Default relay, reached over implicit TLS.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// SMTPS port.
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Where and how to log in for SMTP delivery.
///
/// The username is the sender address.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Application password for the sender account.
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self { host: DEFAULT_SMTP_HOST.to_string(), port: DEFAULT_SMTP_PORT, password: None }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Failure reported by a [`MailTransport`].
#[derive(Debug, Error)]
pub enum MailError {
    /// Sending may succeed if tried again.
    #[error(transparent)]
    Transient(io::Error),

    /// The server or client refused the message for good.
    #[error("{0}")]
    Permanent(String),
}

/// Sends built messages.
pub trait MailTransport {
    /// Send one message.
    fn send_mail(&mut self, message: &Message) -> Result<(), MailError>;
}

impl MailTransport for SmtpTransport {
    fn send_mail(&mut self, message: &Message) -> Result<(), MailError> {
        match Transport::send(self, message) {
            Ok(_) => Ok(()),
            Err(e) if e.is_permanent() || e.is_client() => Err(MailError::Permanent(e.to_string())),
            Err(e) => Err(MailError::Transient(io::Error::other(e))),
        }
    }
}

/// Build an authenticated SMTPS transport.
///
/// Nothing is sent and no connection is made until the first message.
pub fn smtp_transport(
    config: &SmtpConfig,
    username: &str,
    password: &str,
) -> Result<SmtpTransport, lettre::transport::smtp::Error> {
    let credentials = Credentials::new(username.to_string(), password.to_string());
    Ok(SmtpTransport::relay(&config.host)?.port(config.port).credentials(credentials).build())
}

/// Errors building a message from a notification.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Sender or recipient address does not parse.
    #[error("bad address: {0}")]
    Address(#[from] AddressError),

    /// Message could not be assembled.
    #[error("bad message: {0}")]
    Build(#[from] lettre::error::Error),
}

impl Notification {
    /// Build the MIME message for this notification.
    pub fn to_message(&self) -> Result<Message, MessageError> {
        let from: Mailbox = self.from.parse()?;
        let to = Mailbox::new(Some(self.name.clone()), self.to.parse::<Address>()?);

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(self.body())?)
    }
}

/// Delivers notifications as email through a [`MailTransport`].
#[derive(Debug)]
pub struct SmtpNotifier<T> {
    transport: T,
    sent: usize,
}

impl<T: MailTransport> SmtpNotifier<T> {
    /// Deliver through `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport, sent: 0 }
    }

    /// Messages accepted by the transport so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: MailTransport> Notifier for SmtpNotifier<T> {
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        let recipient = || notification.name.clone();

        let message = notification.to_message().map_err(|e| DeliveryError::Rejected {
            recipient: recipient(),
            reason: e.to_string(),
        })?;

        self.transport.send_mail(&message).map_err(|e| match e {
            MailError::Transient(source) => DeliveryError::Io { recipient: recipient(), source },
            MailError::Permanent(reason) => {
                DeliveryError::Rejected { recipient: recipient(), reason }
            },
        })?;

        self.sent += 1;
        tracing::debug!(recipient = %notification.name, "message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Records sent messages; fails with queued errors first.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Vec<Message>,
        failures: VecDeque<MailError>,
    }

    impl MailTransport for RecordingTransport {
        fn send_mail(&mut self, message: &Message) -> Result<(), MailError> {
            if let Some(e) = self.failures.pop_front() {
                return Err(e);
            }
            self.sent.push(message.clone());
            Ok(())
        }
    }

    fn notification(name: &str, to: &str) -> Notification {
        Notification {
            from: "santa@example.com".to_string(),
            to: to.to_string(),
            name: name.to_string(),
            giftee: "Bob".to_string(),
        }
    }

    #[test]
    fn message_goes_to_the_recipient_only() {
        let mut notifier = SmtpNotifier::new(RecordingTransport::default());

        notifier.deliver(&notification("Alice", "alice@example.com")).unwrap();

        assert_eq!(notifier.sent(), 1);
        let message = &notifier.transport().sent[0];
        let envelope = message.envelope();
        assert_eq!(envelope.from().map(ToString::to_string).as_deref(), Some("santa@example.com"));
        let to: Vec<String> = envelope.to().iter().map(ToString::to_string).collect();
        assert_eq!(to, ["alice@example.com"]);

        let text = String::from_utf8(message.formatted()).unwrap();
        assert!(text.contains("Subject: Secret Santa\r\n"));
        assert!(text.contains("Hello Alice!"));
        assert!(text.contains("You are the Secret Santa for Bob!"));
    }

    #[test]
    fn bad_recipient_address_is_rejected() {
        let mut notifier = SmtpNotifier::new(RecordingTransport::default());

        let err = notifier.deliver(&notification("Alice", "not an address")).unwrap_err();

        assert_eq!(err.recipient(), "Alice");
        assert!(!err.is_transient());
        assert!(notifier.transport().sent.is_empty());
    }

    #[test]
    fn transport_failures_keep_their_class() {
        let transport = RecordingTransport {
            sent: Vec::new(),
            failures: VecDeque::from([
                MailError::Transient(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
                MailError::Permanent("550 mailbox unavailable".to_string()),
            ]),
        };
        let mut notifier = SmtpNotifier::new(transport);
        let alice = notification("Alice", "alice@example.com");

        let first = notifier.deliver(&alice).unwrap_err();
        assert!(matches!(first, DeliveryError::Io { .. }));
        assert!(first.is_transient());

        let second = notifier.deliver(&alice).unwrap_err();
        assert!(
            matches!(second, DeliveryError::Rejected { ref reason, .. } if reason.contains("550"))
        );

        notifier.deliver(&alice).unwrap();
        assert_eq!(notifier.sent(), 1);
    }

    #[test]
    fn config_debug_hides_password() {
        let config = SmtpConfig { password: Some("hunter2".to_string()), ..SmtpConfig::default() };

        let text = format!("{config:?}");

        assert!(!text.contains("hunter2"));
        assert!(text.contains("smtp.gmail.com"));
    }

    #[test]
    fn transport_builds_without_connecting() {
        let config = SmtpConfig::default();
        assert!(smtp_transport(&config, "santa@example.com", "secret").is_ok());
    }
}
