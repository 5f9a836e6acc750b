//! Tinsel Secret Santa binary.
//!
//! # Usage
//!
//! ```bash
//! # Draw and email everyone through Gmail
//! EMAIL=santa@gmail.com EMAIL_APP_PASS=... tinsel --party party.yaml
//!
//! # Write one message per participant into ./outbox instead of sending
//! tinsel --party party.yaml --from santa@example.com --outbox outbox
//!
//! # See who would be notified without sending anything
//! tinsel --party party.yaml --dry-run
//!
//! # Draw and keep the last three giftees as next year's exclusions
//! tinsel --party party.yaml --from santa@example.com --export next.yaml --history 3
//! ```

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use tinsel_cli::{
    DeliveryPolicy, RunConfig, SmtpConfig, SystemEnv,
    smtp::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT},
};
use tinsel_core::{AssignConfig, DEFAULT_MAX_ATTEMPTS, HistoryCap, Strategy};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Drawing strategy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Prune and draw, repairing dead ends with a swap
    Reconcile,
    /// Draw from the shared hat, start over on dead ends
    Redraw,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Reconcile => Self::Reconcile,
            StrategyArg::Redraw => Self::Redraw,
        }
    }
}

/// Secret Santa draw
#[derive(Parser, Debug)]
#[command(name = "tinsel")]
#[command(about = "Draw Secret Santa names and notify everyone privately")]
#[command(version)]
struct Args {
    /// Party file, YAML or JSON (name -> {email, forbidden})
    #[arg(short, long, env = "PARTY")]
    party: PathBuf,

    /// Sender address, also the SMTP login
    #[arg(short, long, env = "EMAIL", required_unless_present = "dry_run")]
    from: Option<String>,

    /// SMTP relay host (implicit TLS)
    #[arg(long, env = "SMTP_HOST", default_value = DEFAULT_SMTP_HOST)]
    smtp_host: String,

    /// SMTP relay port
    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    smtp_port: u16,

    /// SMTP application password
    #[arg(long, env = "EMAIL_APP_PASS", hide_env_values = true)]
    smtp_password: Option<String>,

    /// Write messages into this directory instead of sending them
    #[arg(short, long, env = "TINSEL_OUTBOX")]
    outbox: Option<PathBuf>,

    /// Log who would be notified instead of delivering anything
    #[arg(long)]
    dry_run: bool,

    /// Drawing strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Reconcile)]
    strategy: StrategyArg,

    /// Full draw cycles before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Write next cycle's party file here
    #[arg(long)]
    export: Option<PathBuf>,

    /// Past giftees kept per participant in the export (0 keeps all)
    #[arg(long, default_value = "0")]
    history: usize,

    /// Delivery retries per participant (0 = best effort)
    #[arg(long, default_value = "0")]
    retries: u32,

    /// Initial retry backoff in milliseconds, doubled per retry
    #[arg(long, default_value = "100")]
    retry_backoff_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> RunConfig {
        RunConfig {
            party: self.party,
            from: self.from,
            outbox: self.outbox,
            smtp: SmtpConfig {
                host: self.smtp_host,
                port: self.smtp_port,
                password: self.smtp_password,
            },
            dry_run: self.dry_run,
            assign: AssignConfig {
                strategy: self.strategy.into(),
                max_attempts: self.max_attempts,
            },
            export: self.export,
            history: HistoryCap::from_count(self.history),
            delivery: DeliveryPolicy::from_retries(self.retries, self.retry_backoff_ms),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = args.into_config();
    tracing::info!("Tinsel starting");
    tracing::info!(party = %config.party.display(), strategy = %config.assign.strategy, "drawing");

    match tinsel_cli::run(&config, SystemEnv::new()) {
        Ok(report) => {
            tracing::info!(
                attempts = report.assignment.attempts,
                swaps = report.assignment.swaps,
                notified = report.delivery.delivered.len(),
                "done"
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(e.exit_code())
        },
    }
}
