//! HTTP client for the Vector Tasks API.
//!
//! Thin wrapper over the REST surface. Calls map any non-2xx response to
//! [`Error::Http`] and perform no retries; retry policy belongs to callers.

use std::str::FromStr;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::model::{
    Briefing, DailyLog, DailyLogPatch, NewBriefing, NewProject, NewTask, Project, ProjectId,
    Status, Task, TaskId, TaskPatch,
};

/// Server-side filter for the briefing history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    HasMorning,
    HasNight,
}

impl FromStr for HistoryFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "morning" => Ok(HistoryFilter::HasMorning),
            "night" | "nightly" => Ok(HistoryFilter::HasNight),
            other => Err(Error::InvalidArgument(format!(
                "unknown history filter '{other}' (expected all, morning, night)"
            ))),
        }
    }
}

/// Injected HTTP client for the task/project/daily-log API.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(remote: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(remote.timeout_secs))
            .build()?;
        Ok(Self::from_parts(client, remote.base_url.clone()))
    }

    /// Build from an existing client, for callers that manage their own.
    pub fn from_parts(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get_json("/tasks").await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("/projects").await
    }

    /// Today's daily log, or `None` when the day has no record yet.
    pub async fn daily_log(&self) -> Result<Option<DailyLog>> {
        self.get_json("/daily-log").await
    }

    pub async fn briefing_history(
        &self,
        filter: HistoryFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<DailyLog>> {
        let mut request = self
            .client
            .get(self.url("/daily-log/history"))
            .query(&[("limit", limit), ("offset", offset)]);
        match filter {
            HistoryFilter::All => {}
            HistoryFilter::HasMorning => request = request.query(&[("has_morning", true)]),
            HistoryFilter::HasNight => request = request.query(&[("has_night", true)]),
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    pub async fn create_task(&self, new: &NewTask) -> Result<Task> {
        self.post_json("/tasks", new).await
    }

    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let path = format!("/tasks/{id}");
        let response = self
            .client
            .patch(self.url(&path))
            .json(patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn set_task_status(&self, id: TaskId, status: Status) -> Result<Task> {
        self.update_task(id, &TaskPatch::status(status)).await
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        let path = format!("/tasks/{id}");
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn create_project(&self, new: &NewProject) -> Result<Project> {
        self.post_json("/projects", new).await
    }

    /// Deleting a sector cascades to its sub-sectors server-side.
    pub async fn delete_project(&self, id: ProjectId) -> Result<()> {
        let path = format!("/projects/{id}");
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn update_daily_log(&self, patch: &DailyLogPatch) -> Result<DailyLog> {
        self.post_json("/daily-log/update", patch).await
    }

    pub async fn add_briefing(&self, new: &NewBriefing) -> Result<Briefing> {
        self.post_json("/daily-log/briefing", new).await
    }

    pub async fn mark_goal_completed(&self, goal: &str) -> Result<DailyLog> {
        let response = self
            .client
            .post(self.url("/daily-log/mark-goal"))
            .query(&[("goal", goal)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}
