//! Optimistic mutation gate.
//!
//! Mutations are fire-and-forget: the caller applies its local intent
//! immediately, the server call runs in the background, and the next
//! authoritative snapshot load reconciles whatever actually happened. A
//! failed call is logged, never surfaced as a blocking failure - the
//! transient inconsistency self-heals on the next sync tick.
//!
//! Client-side validation runs before any network call and is the only
//! synchronous failure mode. Each method hands back a `JoinHandle<bool>`
//! (true = server accepted) so callers that cannot rely on push
//! notifications may await settlement and then force a reload.

use chrono::{DateTime, Utc};
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{
    DailyLog, DailyLogPatch, NewBriefing, NewProject, NewTask, ProjectId, Status, TaskId,
};
use crate::remote::RemoteStore;

#[derive(Debug, Clone)]
pub struct MutationGate {
    store: RemoteStore,
}

impl MutationGate {
    pub fn new(store: RemoteStore) -> Self {
        Self { store }
    }

    pub fn set_status(&self, id: TaskId, status: Status) -> JoinHandle<bool> {
        let store = self.store.clone();
        dispatch("set_status", async move {
            store.set_task_status(id, status).await
        })
    }

    pub fn create_task(&self, new: NewTask) -> Result<JoinHandle<bool>> {
        new.validate()?;
        let store = self.store.clone();
        Ok(dispatch("create_task", async move {
            store.create_task(&new).await
        }))
    }

    pub fn delete_task(&self, id: TaskId) -> JoinHandle<bool> {
        let store = self.store.clone();
        dispatch("delete_task", async move { store.delete_task(id).await })
    }

    pub fn create_project(&self, new: NewProject) -> Result<JoinHandle<bool>> {
        new.validate()?;
        let store = self.store.clone();
        Ok(dispatch("create_project", async move {
            store.create_project(&new).await
        }))
    }

    pub fn delete_project(&self, id: ProjectId) -> JoinHandle<bool> {
        let store = self.store.clone();
        dispatch("delete_project", async move {
            store.delete_project(id).await
        })
    }

    pub fn update_daily_log(&self, patch: DailyLogPatch) -> JoinHandle<bool> {
        let store = self.store.clone();
        dispatch("update_daily_log", async move {
            store.update_daily_log(&patch).await
        })
    }

    pub fn add_briefing(&self, new: NewBriefing) -> Result<JoinHandle<bool>> {
        new.validate()?;
        let store = self.store.clone();
        Ok(dispatch("add_briefing", async move {
            store.add_briefing(&new).await
        }))
    }

    pub fn mark_goal(&self, goal: String) -> Result<JoinHandle<bool>> {
        if goal.trim().is_empty() {
            return Err(Error::Validation("goal cannot be empty".to_string()));
        }
        let store = self.store.clone();
        Ok(dispatch("mark_goal", async move {
            store.mark_goal_completed(&goal).await
        }))
    }

    /// Persist a countdown end instant (None stops the timer). Unlike the
    /// fire-and-forget mutations this is awaited: the caller started the
    /// local countdown optimistically and must roll it back on failure.
    pub async fn persist_timer(&self, end: Option<DateTime<Utc>>) -> Result<DailyLog> {
        self.store.update_daily_log(&DailyLogPatch::timer(end)).await
    }
}

/// Await a dispatched mutation; a panicked task counts as rejected.
pub async fn settled(handle: JoinHandle<bool>) -> bool {
    handle.await.unwrap_or(false)
}

fn dispatch<T, F>(action: &'static str, call: F) -> JoinHandle<bool>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    tokio::spawn(async move {
        match call.await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, action, "mutation failed; next sync will reconcile");
                false
            }
        }
    })
}
