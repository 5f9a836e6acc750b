//! Notification transports.
//!
//! A [`Notifier`] delivers one private message per participant telling them
//! whose Secret Santa they are. Delivery errors are per recipient and carry
//! the recipient's name so the batch can report them without aborting.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Subject line of every notification.
pub const SUBJECT: &str = "Secret Santa";

/// One participant's private message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Recipient's name.
    pub name: String,
    /// Who the recipient gifts.
    pub giftee: String,
}

impl Notification {
    /// Message body.
    pub fn body(&self) -> String {
        format!("Hello {}!\r\n\r\nYou are the Secret Santa for {}!\r\n", self.name, self.giftee)
    }

    /// Full RFC 5322 message: headers, blank line, body.
    pub fn render(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
            self.from,
            self.to,
            SUBJECT,
            self.body()
        )
    }
}

/// Errors from delivering a single notification.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Transport I/O failed.
    #[error("delivery to {recipient} failed: {source}")]
    Io {
        /// Recipient's name.
        recipient: String,
        /// Underlying error.
        source: io::Error,
    },

    /// Transport refused the message.
    #[error("delivery to {recipient} rejected: {reason}")]
    Rejected {
        /// Recipient's name.
        recipient: String,
        /// Reason given by the transport.
        reason: String,
    },
}

impl DeliveryError {
    /// Recipient the failed delivery was for.
    pub fn recipient(&self) -> &str {
        match self {
            Self::Io { recipient, .. } | Self::Rejected { recipient, .. } => recipient,
        }
    }

    /// Returns true if retrying the same message could succeed.
    ///
    /// I/O failures may be transient; a rejection will be repeated.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io { .. } => true,
            Self::Rejected { .. } => false,
        }
    }
}

/// Delivers notifications.
pub trait Notifier {
    /// Deliver one notification.
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Writes each message as a `.eml` file into a directory.
///
/// The outbox can be handed to any mail client or `sendmail -t` for the
/// actual send. File names are derived from the recipient's name; clashes
/// after sanitizing get a numeric suffix.
///
/// Messages left over from an earlier draw are removed when the outbox is
/// opened, so it only ever holds the current draw.
#[derive(Debug)]
pub struct OutboxNotifier {
    dir: PathBuf,
    used: HashSet<String>,
}

impl OutboxNotifier {
    /// Create the outbox directory if needed and clear stale messages.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut stale = 0usize;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "eml") {
                fs::remove_file(&path)?;
                stale += 1;
            }
        }
        if stale > 0 {
            tracing::info!(dir = %dir.display(), removed = stale, "cleared stale messages");
        }

        Ok(Self { dir, used: HashSet::new() })
    }

    /// Outbox directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&mut self, name: &str) -> String {
        let stem: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '_' }
            })
            .collect();

        let mut candidate = format!("{stem}.eml");
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{stem}-{n}.eml");
            n += 1;
        }
        candidate
    }
}

impl Notifier for OutboxNotifier {
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        let file_name = self.file_name(&notification.name);
        let path = self.dir.join(file_name);
        fs::write(&path, notification.render())
            .map_err(|source| DeliveryError::Io { recipient: notification.name.clone(), source })?;

        tracing::debug!(recipient = %notification.name, path = %path.display(), "message written");
        Ok(())
    }
}

/// Logs who would be notified without sending anything.
///
/// Never logs the giftee, so a dry run can be watched without spoiling it.
#[derive(Debug, Default)]
pub struct DryRunNotifier {
    recipients: Vec<String>,
}

impl DryRunNotifier {
    /// Create an empty dry-run notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of everyone who would have been notified, in order.
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }
}

impl Notifier for DryRunNotifier {
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::info!(
            recipient = %notification.name,
            address = %notification.to,
            "dry run: would notify"
        );
        self.recipients.push(notification.name.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(name: &str) -> Notification {
        Notification {
            from: "santa@example.com".to_string(),
            to: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            giftee: "Bob".to_string(),
        }
    }

    #[test]
    fn render_has_headers_then_body() {
        let text = notification("Alice").render();

        assert!(text.starts_with(
            "From: santa@example.com\r\nTo: alice@example.com\r\nSubject: Secret Santa\r\n\r\n"
        ));
        assert!(text.ends_with("Hello Alice!\r\n\r\nYou are the Secret Santa for Bob!\r\n"));
    }

    #[test]
    fn outbox_writes_one_file_per_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let mut outbox = OutboxNotifier::new(dir.path().join("out")).unwrap();

        outbox.deliver(&notification("Alice")).unwrap();
        outbox.deliver(&notification("Carol")).unwrap();

        let text = fs::read_to_string(outbox.dir().join("alice.eml")).unwrap();
        assert!(text.contains("You are the Secret Santa for Bob!"));
        assert!(outbox.dir().join("carol.eml").exists());
    }

    #[test]
    fn outbox_clears_messages_from_an_earlier_draw() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gone.eml"), "last year's message").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let mut outbox = OutboxNotifier::new(dir.path()).unwrap();
        assert!(!dir.path().join("gone.eml").exists());
        assert!(dir.path().join("notes.txt").exists());

        outbox.deliver(&notification("Alice")).unwrap();
        let mut left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(left, ["alice.eml", "notes.txt"]);
    }

    #[test]
    fn outbox_disambiguates_clashing_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut outbox = OutboxNotifier::new(dir.path()).unwrap();

        outbox.deliver(&notification("Ann B")).unwrap();
        outbox.deliver(&notification("Ann_B")).unwrap();

        assert!(dir.path().join("ann_b.eml").exists());
        assert!(dir.path().join("ann_b-2.eml").exists());
    }

    #[test]
    fn outbox_reports_io_failure_with_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let mut outbox = OutboxNotifier::new(dir.path()).unwrap();
        // A directory where the file should go makes the write fail
        fs::create_dir(dir.path().join("alice.eml")).unwrap();

        let err = outbox.deliver(&notification("Alice")).unwrap_err();

        assert_eq!(err.recipient(), "Alice");
        assert!(err.is_transient());
    }

    #[test]
    fn dry_run_records_recipients() {
        let mut dry = DryRunNotifier::new();
        dry.deliver(&notification("Alice")).unwrap();
        dry.deliver(&notification("Carol")).unwrap();
        assert_eq!(dry.recipients(), ["Alice", "Carol"]);
    }

    #[test]
    fn rejection_is_not_transient() {
        let err = DeliveryError::Rejected {
            recipient: "Alice".to_string(),
            reason: "mailbox full".to_string(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "delivery to Alice rejected: mailbox full");
    }
}
