//! vcc timer command implementations.
//!
//! Starting a countdown is optimistic: the local countdown begins ticking
//! from the requested duration before the server has confirmed persistence.
//! If persistence fails the countdown is rolled back to idle and one fresh
//! load resynchronizes against server truth.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::countdown::Countdown;
use crate::error::{Error, Result};
use crate::mutate::MutationGate;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::remote::RemoteStore;
use crate::snapshot::SnapshotLoader;

pub struct StartOptions {
    pub minutes: i64,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct StopOptions {
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub async fn run_start(opts: StartOptions) -> Result<()> {
    if opts.minutes <= 0 {
        return Err(Error::InvalidArgument(
            "timer duration must be at least one minute".to_string(),
        ));
    }

    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store.clone());

    let mut countdown = Countdown::idle();
    let end = countdown.start(Utc::now(), Duration::minutes(opts.minutes));

    if let Err(err) = gate.persist_timer(Some(end)).await {
        countdown.clear();
        // resynchronize against server truth before reporting the failure
        let _ = SnapshotLoader::new(store).load().await;
        return Err(err);
    }

    #[derive(Serialize)]
    struct StartData {
        end: DateTime<Utc>,
        display: String,
    }

    let display = countdown.display(Utc::now());
    let mut human = HumanOutput::new(format!("Timer running: {display}"));
    human.push_summary("Ends", end.to_rfc3339());

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "timer start",
        &StartData { end, display },
        Some(&human),
    )
}

pub async fn run_stop(opts: StopOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    gate.persist_timer(None).await?;

    #[derive(Serialize)]
    struct StopData {
        stopped: bool,
    }

    let human = HumanOutput::new("Timer stopped");
    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "timer stop",
        &StopData { stopped: true },
        Some(&human),
    )
}
