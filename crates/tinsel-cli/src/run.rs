//! One complete draw: load, assign, export, notify.

use std::path::{Path, PathBuf};

use tinsel_core::{
    AssignConfig, AssignError, Assignment, AssignmentEngine, Environment, HistoryCap,
    ResolvedRoster, Roster, next_cycle,
};

use crate::{
    delivery::{DeliveryPolicy, DeliveryReport, notify_all},
    error::CliError,
    notifier::{DryRunNotifier, Notifier, OutboxNotifier},
    party::{load_party, write_next_cycle},
    smtp::{SmtpConfig, SmtpNotifier, smtp_transport},
};

/// Sender used for dry runs when none is configured.
pub const DRY_RUN_SENDER: &str = "secret-santa@localhost";

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Party file to draw from.
    pub party: PathBuf,
    /// Sender address. Required unless `dry_run`.
    pub from: Option<String>,
    /// Write messages into this directory instead of sending them.
    pub outbox: Option<PathBuf>,
    /// SMTP relay used when there is no outbox.
    pub smtp: SmtpConfig,
    /// Log recipients instead of delivering anything.
    pub dry_run: bool,
    /// Engine configuration.
    pub assign: AssignConfig,
    /// Where to write next cycle's party file, if anywhere.
    pub export: Option<PathBuf>,
    /// How much giftee history the export keeps.
    pub history: HistoryCap,
    /// How failed deliveries are handled.
    pub delivery: DeliveryPolicy,
}

/// Summary of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// Engine receipt.
    pub assignment: Assignment,
    /// Per-recipient delivery outcome.
    pub delivery: DeliveryReport,
    /// Next-cycle file written, if requested.
    pub exported: Option<PathBuf>,
}

/// How notifications leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel<'a> {
    DryRun,
    Outbox(&'a Path),
    Smtp { password: &'a str },
}

/// Run a draw using the notifier selected by `config`.
///
/// A dry run only logs. Otherwise messages go to the outbox when one is
/// configured and out over SMTP when not. Delivery settings are checked
/// before the draw; the outbox is only touched once the draw has succeeded.
pub fn run<E: Environment>(config: &RunConfig, env: E) -> Result<RunReport, CliError> {
    let from = sender(config)?;
    let channel = channel(config)?;
    let mut roster = load_party(&config.party)?;
    let assignment = draw(config, env, &mut roster)?;

    match channel {
        Channel::DryRun => {
            finish(config, &from, &roster, assignment, &mut DryRunNotifier::new())
        },
        Channel::Outbox(dir) => {
            let mut outbox = OutboxNotifier::new(dir)
                .map_err(|source| CliError::Outbox { path: dir.to_path_buf(), source })?;
            finish(config, &from, &roster, assignment, &mut outbox)
        },
        Channel::Smtp { password } => {
            let transport = smtp_transport(&config.smtp, &from, password)
                .map_err(|source| CliError::Smtp { host: config.smtp.host.clone(), source })?;
            tracing::info!(host = %config.smtp.host, port = config.smtp.port, "sending over SMTP");
            finish(config, &from, &roster, assignment, &mut SmtpNotifier::new(transport))
        },
    }
}

/// Run a draw, delivering through `notifier` regardless of `dry_run`.
pub fn run_with<E: Environment, N: Notifier>(
    config: &RunConfig,
    env: E,
    notifier: &mut N,
) -> Result<RunReport, CliError> {
    let from = sender(config)?;
    let mut roster = load_party(&config.party)?;
    let assignment = draw(config, env, &mut roster)?;
    finish(config, &from, &roster, assignment, notifier)
}

fn sender(config: &RunConfig) -> Result<String, CliError> {
    match (&config.from, config.dry_run) {
        (Some(from), _) if !from.trim().is_empty() => Ok(from.clone()),
        (_, true) => Ok(DRY_RUN_SENDER.to_string()),
        (_, false) => {
            Err(CliError::Config("a sender address is required (--from or EMAIL)".to_string()))
        },
    }
}

fn channel(config: &RunConfig) -> Result<Channel<'_>, CliError> {
    if config.dry_run {
        return Ok(Channel::DryRun);
    }
    if let Some(dir) = &config.outbox {
        return Ok(Channel::Outbox(dir));
    }
    match config.smtp.password.as_deref() {
        Some(password) if !password.is_empty() => Ok(Channel::Smtp { password }),
        _ => Err(CliError::Config(
            "an SMTP password is required (--smtp-password or EMAIL_APP_PASS); \
             use --outbox to write messages to disk instead"
                .to_string(),
        )),
    }
}

fn draw<E: Environment>(
    config: &RunConfig,
    env: E,
    roster: &mut Roster,
) -> Result<Assignment, CliError> {
    let engine = AssignmentEngine::new(env, config.assign);
    engine.assign(roster).map_err(|e| {
        tracing::error!(error = %e, "no valid assignment");
        CliError::from(e)
    })
}

fn finish<N: Notifier>(
    config: &RunConfig,
    from: &str,
    roster: &Roster,
    assignment: Assignment,
    notifier: &mut N,
) -> Result<RunReport, CliError> {
    let resolved = ResolvedRoster::new(roster).map_err(AssignError::from)?;

    let exported = match &config.export {
        Some(path) => {
            write_next_cycle(path, &next_cycle(resolved, config.history))?;
            Some(path.clone())
        },
        None => None,
    };

    let delivery = notify_all(resolved, from, notifier, config.delivery);
    if !delivery.is_complete() {
        return Err(CliError::Delivery { failed: delivery.failed.len(), total: resolved.len() });
    }

    tracing::info!(notified = delivery.delivered.len(), "all participants notified");
    Ok(RunReport { assignment, delivery, exported })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: Option<&str>, dry_run: bool) -> RunConfig {
        RunConfig {
            party: PathBuf::from("party.json"),
            from: from.map(str::to_string),
            outbox: None,
            smtp: SmtpConfig::default(),
            dry_run,
            assign: AssignConfig::default(),
            export: None,
            history: HistoryCap::Unbounded,
            delivery: DeliveryPolicy::BestEffort,
        }
    }

    #[test]
    fn sender_required_for_real_runs() {
        let err = sender(&config(None, false)).unwrap_err();
        assert_eq!(err.exit_code(), 1);

        let err = sender(&config(Some("  "), false)).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn dry_run_falls_back_to_placeholder_sender() {
        assert_eq!(sender(&config(None, true)).unwrap(), DRY_RUN_SENDER);
        assert_eq!(sender(&config(Some("santa@x"), true)).unwrap(), "santa@x");
    }

    #[test]
    fn channel_prefers_dry_run_then_outbox_then_smtp() {
        let mut cfg = config(Some("santa@x"), true);
        cfg.outbox = Some(PathBuf::from("out"));
        assert_eq!(channel(&cfg).unwrap(), Channel::DryRun);

        cfg.dry_run = false;
        assert_eq!(channel(&cfg).unwrap(), Channel::Outbox(Path::new("out")));

        cfg.outbox = None;
        cfg.smtp.password = Some("app-pass".to_string());
        assert_eq!(channel(&cfg).unwrap(), Channel::Smtp { password: "app-pass" });
    }

    #[test]
    fn smtp_without_password_fails_before_drawing() {
        let mut cfg = config(Some("santa@x"), false);
        cfg.party = Path::new("/nonexistent/party.json").to_path_buf();

        let err = run(&cfg, crate::SystemEnv::new()).unwrap_err();

        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("EMAIL_APP_PASS")));

        cfg.smtp.password = Some(String::new());
        assert!(matches!(channel(&cfg), Err(CliError::Config(_))));
    }

    #[test]
    fn missing_party_file_is_a_config_failure() {
        let mut cfg = config(Some("santa@x"), true);
        cfg.party = Path::new("/nonexistent/party.json").to_path_buf();

        let err = run(&cfg, crate::SystemEnv::new()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
