//! vcc dashboard command implementation.
//!
//! One-shot mode loads a single snapshot and renders it. Watch mode runs
//! the full synchronization loop: push invalidations, the fixed-interval
//! poll and reconnect-gap refreshes all funnel into generation-gated loads,
//! and the countdown ticks locally once per second between renders.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::countdown::Countdown;
use crate::error::Result;
use crate::model::Task;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::remote::RemoteStore;
use crate::snapshot::{SectorStatus, Snapshot, SnapshotLoader};
use crate::sync;
use crate::view;
use crate::{cli::log::log_lines, cli::task::task_line, live::LiveChannel};

pub struct DashboardOptions {
    pub watch: bool,
    pub sector: Option<i64>,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub async fn run(opts: DashboardOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let loader = SnapshotLoader::new(store);

    if !opts.watch {
        let snapshot = loader.load().await;
        return render(
            &snapshot,
            opts.sector,
            None,
            OutputOptions {
                json: opts.json,
                quiet: opts.quiet,
            },
        );
    }

    watch(loader, opts).await
}

async fn watch(loader: SnapshotLoader, opts: DashboardOptions) -> Result<()> {
    let options = OutputOptions {
        json: opts.json,
        quiet: opts.quiet,
    };

    let live = LiveChannel::connect(opts.config.remote.ws_url()?, &opts.config.sync);
    let handle = sync::spawn(loader, Some(live), &opts.config.sync);
    let mut snapshots = handle.snapshots();
    let connected = handle.connected();

    let mut countdown = Countdown::idle();
    // the ticker belongs to this view; snapshot churn never resets it
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot: Arc<Snapshot> = snapshots.borrow_and_update().clone();
                let end = snapshot.daily_log.as_ref().and_then(|log| log.timer_end);
                countdown.sync_end(end);
                render(&snapshot, opts.sector, Some(*connected.borrow()), options)?;
            }
            _ = ticker.tick() => {
                if countdown.is_running() && !options.json && !options.quiet {
                    println!("timer {}", countdown.display(Utc::now()));
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
        }
    }

    handle.shutdown();
    Ok(())
}

fn render(
    snapshot: &Snapshot,
    sector: Option<i64>,
    connected: Option<bool>,
    options: OutputOptions,
) -> Result<()> {
    #[derive(Serialize)]
    struct DashboardData<'a> {
        momentum: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        connected: Option<bool>,
        sectors: Vec<&'a SectorStatus>,
        active_queue: Vec<Task>,
        history: &'a [Task],
        daily_log: &'a Option<crate::model::DailyLog>,
        loaded_at: DateTime<Utc>,
    }

    let data = DashboardData {
        momentum: snapshot.momentum,
        connected,
        sectors: ordered_sectors(&snapshot.projects),
        active_queue: view::filter_by_project(&snapshot.active_queue, sector),
        history: &snapshot.history,
        daily_log: &snapshot.daily_log,
        loaded_at: snapshot.loaded_at,
    };

    let mut human = HumanOutput::new("Vector Command Center");
    human.push_summary("Momentum", format!("{} XP", data.momentum));
    if let Some(connected) = connected {
        human.push_summary(
            "Push",
            if connected { "connected" } else { "offline" }.to_string(),
        );
    }
    human.push_summary("Active quests", data.active_queue.len().to_string());

    for status in &data.sectors {
        let indent = if status.project.parent_id.is_some() {
            "  "
        } else {
            ""
        };
        human.push_detail(format!(
            "{indent}sector #{} {} - {} active",
            status.project.id, status.project.name, status.active_count
        ));
    }
    for task in &data.active_queue {
        human.push_detail(task_line(task));
    }
    for task in data.history {
        human.push_detail(format!("{} (done today)", task_line(task)));
    }
    if let Some(log) = data.daily_log {
        for line in log_lines(log) {
            human.push_detail(line);
        }
    }
    if let Some(false) = connected {
        human.push_warning("push channel offline; relying on the poll interval".to_string());
    }

    emit_success(options, "dashboard", &data, Some(&human))
}

/// Sectors in display order with their derived counts attached.
fn ordered_sectors(sectors: &[SectorStatus]) -> Vec<&SectorStatus> {
    let projects: Vec<crate::model::Project> = sectors
        .iter()
        .map(|status| status.project.clone())
        .collect();
    view::group_projects(&projects)
        .into_iter()
        .filter_map(|project| {
            sectors
                .iter()
                .find(|status| status.project.id == project.id)
        })
        .collect()
}
