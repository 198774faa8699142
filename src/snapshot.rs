//! Dashboard snapshot loading and derivation.
//!
//! One load cycle pulls tasks, sectors and today's log, then derives the
//! momentum score, the priority-ordered active queue, the done-today history
//! and per-sector active counts. Each load produces a fresh immutable
//! [`Snapshot`]; view state replaces the previous one wholesale.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::model::{same_local_day, DailyLog, Project, Task};
use crate::remote::RemoteStore;

/// Momentum awarded per task completed today.
pub const MOMENTUM_PER_TASK: u32 = 10;

/// A sector together with its derived active-task count. The count is
/// recomputed from the task snapshot on every load, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct SectorStatus {
    #[serde(flatten)]
    pub project: Project,
    pub active_count: usize,
}

/// One immutable consolidated read of tasks, sectors and today's log.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Daily momentum score: completions today x 10.
    pub momentum: u32,
    /// Tasks not yet done, highest priority first.
    pub active_queue: Vec<Task>,
    /// Tasks completed today, most recent first.
    pub history: Vec<Task>,
    pub projects: Vec<SectorStatus>,
    pub daily_log: Option<DailyLog>,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// The defined empty state rendered when loading fails.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            momentum: 0,
            active_queue: Vec::new(),
            history: Vec::new(),
            projects: Vec::new(),
            daily_log: None,
            loaded_at: now,
        }
    }
}

/// Pure derivation from one set of server responses.
///
/// Ordering rules consumers depend on:
/// - active queue: stable sort, priority rank descending, ties keep arrival
///   order
/// - history: done on the current local calendar day, `updated_at`
///   descending
/// - sector counts: computed from the active queue only
pub fn build_snapshot(
    tasks: Vec<Task>,
    projects: Vec<Project>,
    daily_log: Option<DailyLog>,
    now: DateTime<Utc>,
) -> Snapshot {
    let (active, done): (Vec<Task>, Vec<Task>) =
        tasks.into_iter().partition(|task| !task.status.is_done());

    let mut active_queue = active;
    active_queue.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));

    let mut history: Vec<Task> = done
        .into_iter()
        .filter(|task| same_local_day(task.updated_at, now))
        .collect();
    history.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let momentum = history.len() as u32 * MOMENTUM_PER_TASK;

    let projects = projects
        .into_iter()
        .map(|project| {
            let active_count = active_queue
                .iter()
                .filter(|task| task.project_id == Some(project.id))
                .count();
            SectorStatus {
                project,
                active_count,
            }
        })
        .collect();

    Snapshot {
        momentum,
        active_queue,
        history,
        projects,
        daily_log,
        loaded_at: now,
    }
}

/// Pulls a consolidated dashboard snapshot on demand.
///
/// `load` never fails: any [`RemoteStore`] error is absorbed into
/// [`Snapshot::empty`] so the consuming view always has a renderable state.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    store: RemoteStore,
}

impl SnapshotLoader {
    pub fn new(store: RemoteStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RemoteStore {
        &self.store
    }

    pub async fn load(&self) -> Snapshot {
        let now = Utc::now();
        match self.fetch().await {
            Ok((tasks, projects, daily_log)) => build_snapshot(tasks, projects, daily_log, now),
            Err(err) => {
                warn!(error = %err, "snapshot load failed, rendering empty state");
                Snapshot::empty(now)
            }
        }
    }

    async fn fetch(
        &self,
    ) -> crate::error::Result<(Vec<Task>, Vec<Project>, Option<DailyLog>)> {
        let (tasks, projects, daily_log) = tokio::join!(
            self.store.list_tasks(),
            self.store.list_projects(),
            self.store.daily_log(),
        );
        Ok((tasks?, projects?, daily_log?))
    }
}
