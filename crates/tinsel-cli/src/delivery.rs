//! Delivery policy and the notification batch.
//!
//! Every participant gets exactly one delivery attempt sequence. A failure
//! for one recipient is logged and recorded, then the batch moves on; the
//! draw itself is never touched.

use std::time::Duration;

use tinsel_core::ResolvedRoster;

use crate::notifier::{DeliveryError, Notification, Notifier};

/// Policy for handling failed deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Log failure and continue to next recipient.
    #[default]
    BestEffort,

    /// Retry transient failures with exponential backoff.
    Retry {
        /// Maximum number of retry attempts after the first try
        max_attempts: u32,
        /// Initial backoff duration in milliseconds
        initial_backoff_ms: u64,
    },
}

impl DeliveryPolicy {
    /// `0` retries means best effort.
    pub fn from_retries(retries: u32, initial_backoff_ms: u64) -> Self {
        if retries == 0 {
            Self::BestEffort
        } else {
            Self::Retry { max_attempts: retries, initial_backoff_ms }
        }
    }
}

/// Outcome of a notification batch.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    /// Recipients notified, in roster order.
    pub delivered: Vec<String>,
    /// Recipients whose delivery failed, with the last error.
    pub failed: Vec<DeliveryError>,
}

impl DeliveryReport {
    /// True if every participant was notified.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Notify every participant of their giftee.
///
/// Takes a [`ResolvedRoster`], so it can only run after a complete, valid
/// draw.
pub fn notify_all<N: Notifier>(
    resolved: ResolvedRoster<'_>,
    from: &str,
    notifier: &mut N,
    policy: DeliveryPolicy,
) -> DeliveryReport {
    notify_all_with(resolved, from, notifier, policy, std::thread::sleep)
}

/// [`notify_all`] with an injectable sleep for retry backoff.
pub fn notify_all_with<N: Notifier>(
    resolved: ResolvedRoster<'_>,
    from: &str,
    notifier: &mut N,
    policy: DeliveryPolicy,
    mut sleep: impl FnMut(Duration),
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for (participant, giftee) in resolved.iter() {
        let notification = Notification {
            from: from.to_string(),
            to: participant.address().to_string(),
            name: participant.name().to_string(),
            giftee: giftee.to_string(),
        };

        match deliver_with_policy(notifier, &notification, policy, &mut sleep) {
            Ok(()) => {
                tracing::info!(recipient = %notification.name, "notified");
                report.delivered.push(notification.name);
            },
            Err(e) => {
                tracing::warn!(recipient = %notification.name, error = %e, "notification failed");
                report.failed.push(e);
            },
        }
    }

    report
}

fn deliver_with_policy<N: Notifier>(
    notifier: &mut N,
    notification: &Notification,
    policy: DeliveryPolicy,
    sleep: &mut impl FnMut(Duration),
) -> Result<(), DeliveryError> {
    let (retries, mut backoff) = match policy {
        DeliveryPolicy::BestEffort => return notifier.deliver(notification),
        DeliveryPolicy::Retry { max_attempts, initial_backoff_ms } => {
            (max_attempts, Duration::from_millis(initial_backoff_ms))
        },
    };

    let mut attempt = 0;
    loop {
        match notifier.deliver(notification) {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                tracing::debug!(recipient = %notification.name, attempt, error = %e, "retrying");
                sleep(backoff);
                backoff = backoff.saturating_mul(2);
            },
            Err(e) => return Err(e),
        }
    }
}
