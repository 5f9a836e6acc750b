//! Tinsel command-line front end.
//!
//! Wires the Sans-IO draw engine from [`tinsel_core`] to the outside world:
//! OS randomness, party files on disk, and per-participant email.
//!
//! # Architecture
//!
//! ```text
//! party.yaml ──► load_party ──► Roster
//!                                 │
//!                    AssignmentEngine<SystemEnv>
//!                                 │
//!                          ResolvedRoster ──► write_next_cycle (optional)
//!                                 │
//!                   notify_all(DeliveryPolicy)
//!                                 │
//!      SmtpNotifier / OutboxNotifier / DryRunNotifier
//! ```
//!
//! Notification only accepts a [`tinsel_core::ResolvedRoster`], so nothing
//! is ever sent for an incomplete draw. Delivery failures are collected and
//! reported once everyone has been attempted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod delivery;
pub mod error;
pub mod notifier;
pub mod party;
pub mod run;
pub mod smtp;
pub mod system_env;

pub use delivery::{DeliveryPolicy, DeliveryReport, notify_all, notify_all_with};
pub use error::CliError;
pub use notifier::{DeliveryError, DryRunNotifier, Notification, Notifier, OutboxNotifier};
pub use party::{
    PartyEntry, PartyError, PartyFormat, load_party, parse_party, write_next_cycle,
};
pub use run::{RunConfig, RunReport, run, run_with};
pub use smtp::{MailError, MailTransport, SmtpConfig, SmtpNotifier};
pub use system_env::SystemEnv;
