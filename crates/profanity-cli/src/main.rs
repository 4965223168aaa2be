// prose-core-client/profanity-cli
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use jid::BareJid;
use tracing::info;

use profanity_core::{EventSink, Session, SessionEvent};

/// Smoke-test binary: wires a `profanity_core::Session` up to a real server and prints every
/// `SessionEvent` it emits. Not the TUI; just enough to drive the core end to end.
#[derive(Parser)]
struct Args {
    /// Bare JID to log in as, e.g. `user@example.org`.
    jid: BareJid,

    /// Password; if omitted, read from the `PROFANITY_PASSWORD` environment variable.
    #[arg(long)]
    password: Option<String>,

    /// Path to the accounts file (created if it doesn't exist).
    #[arg(long, default_value = "./profanity-accounts")]
    accounts: String,
}

struct PrintlnSink;

impl EventSink for PrintlnSink {
    fn handle(&self, event: SessionEvent) {
        println!("{event:?}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let password = args
        .password
        .or_else(|| std::env::var("PROFANITY_PASSWORD").ok())
        .context("no password given (pass --password or set PROFANITY_PASSWORD)")?;

    let mut session = Session::new(&args.accounts, PrintlnSink)?;

    let account_name = args.jid.to_string();
    if session.accounts().get(&account_name).is_err() {
        session
            .accounts_mut()
            .add(&account_name, &args.jid, None, None, None, None)?;
    }
    session
        .accounts_mut()
        .set(&account_name, "password", &password)?;

    info!(account = %account_name, "logging in");
    session.login(&account_name).await?;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        session.process_events()?;
        ticker.tick().await;
        session.tick(now());

        if let Some(account) = session.reconnect_due() {
            info!(account = %account, "attempting reconnect");
            if let Err(err) = session.login(&account).await {
                tracing::warn!(account = %account, "reconnect attempt failed: {}", err);
            }
        }
    }
}

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
