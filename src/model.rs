//! Wire-level data model for the Vector Command Center API.
//!
//! All records are owned by the server; everything here is a snapshot of
//! server state plus the partial payloads used to mutate it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type TaskId = i64;
pub type ProjectId = i64;
pub type LogId = i64;

/// Task priority. Ordered for sorting: High > Med > Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    /// Numeric rank used for descending priority sorts.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Med => 2,
            Priority::Low => 1,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Med
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "Low",
            Priority::Med => "Med",
            Priority::High => "High",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "med" | "medium" => Ok(Priority::Med),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown priority '{other}' (expected Low, Med, High)"
            ))),
        }
    }
}

/// Task status. Any status is reachable from any other by explicit action;
/// `next` walks the Todo -> Working -> Done -> Todo cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Todo,
    Working,
    Done,
}

impl Status {
    pub fn next(self) -> Status {
        match self {
            Status::Todo => Status::Working,
            Status::Working => Status::Done,
            Status::Done => Status::Todo,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Todo => "Todo",
            Status::Working => "Working",
            Status::Done => "Done",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "working" => Ok(Status::Working),
            "done" => Ok(Status::Done),
            other => Err(Error::InvalidArgument(format!(
                "unknown status '{other}' (expected Todo, Working, Done)"
            ))),
        }
    }
}

/// A task ("quest" in the UI copy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub nudge_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project ("sector" in the UI copy). One level of sub-sector nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub parent_id: Option<ProjectId>,
}

/// Briefing slots, in the order they appear across an operational day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BriefingSlot {
    Morning,
    Midday,
    Shutdown,
    Night,
}

impl fmt::Display for BriefingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BriefingSlot::Morning => "Morning",
            BriefingSlot::Midday => "Midday",
            BriefingSlot::Shutdown => "Shutdown",
            BriefingSlot::Night => "Night",
        };
        write!(f, "{label}")
    }
}

impl FromStr for BriefingSlot {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(BriefingSlot::Morning),
            "midday" => Ok(BriefingSlot::Midday),
            "shutdown" => Ok(BriefingSlot::Shutdown),
            "night" | "nightly" => Ok(BriefingSlot::Night),
            other => Err(Error::InvalidArgument(format!(
                "unknown briefing slot '{other}' (expected Morning, Midday, Shutdown, Night)"
            ))),
        }
    }
}

/// A slotted journal entry attached to a daily log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Briefing {
    pub id: i64,
    pub slot: BriefingSlot,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One record per calendar date: the day's objective, goals, briefings and
/// the optional focus-timer end instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: LogId,
    pub date: NaiveDate,
    #[serde(default)]
    pub big_win: Option<String>,
    #[serde(default)]
    pub starting_nudge: Option<String>,
    #[serde(default)]
    pub morning_briefing: Option<String>,
    #[serde(default)]
    pub midday_briefing: Option<String>,
    #[serde(default)]
    pub shutdown_briefing: Option<String>,
    #[serde(default)]
    pub nightly_reflection: Option<String>,
    #[serde(default)]
    pub goals_for_tomorrow: Vec<String>,
    /// Pipe-delimited record of which goals are done. See `completed_goals`.
    #[serde(default)]
    pub reflections: Option<String>,
    #[serde(default)]
    pub timer_end: Option<DateTime<Utc>>,
    /// Historical entries, most recent first (server ordering).
    #[serde(default)]
    pub briefings: Vec<Briefing>,
}

impl DailyLog {
    /// Goals recorded as completed in the pipe-delimited `reflections` field.
    pub fn completed_goals(&self) -> Vec<&str> {
        self.reflections
            .as_deref()
            .unwrap_or("")
            .split('|')
            .filter(|goal| !goal.is_empty())
            .collect()
    }

    pub fn is_goal_completed(&self, goal: &str) -> bool {
        self.completed_goals().contains(&goal)
    }

    /// Text for one briefing slot, if it was ever filled in.
    pub fn slot_content(&self, slot: BriefingSlot) -> Option<&str> {
        match slot {
            BriefingSlot::Morning => self.morning_briefing.as_deref(),
            BriefingSlot::Midday => self.midday_briefing.as_deref(),
            BriefingSlot::Shutdown => self.shutdown_briefing.as_deref(),
            BriefingSlot::Night => self.nightly_reflection.as_deref(),
        }
    }
}

/// Payload for `POST /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial payload for `PATCH /tasks/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nudge_count: Option<u32>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Payload for `POST /projects`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ProjectId>,
}

impl NewProject {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(
                "sector name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial payload for `POST /daily-log/update`.
///
/// `timer_end` is double-optional: `None` leaves the timer untouched,
/// `Some(None)` serializes an explicit null that stops it server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DailyLogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_win: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_nudge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_for_tomorrow: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflections: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_end: Option<Option<DateTime<Utc>>>,
}

impl DailyLogPatch {
    pub fn timer(end: Option<DateTime<Utc>>) -> Self {
        Self {
            timer_end: Some(end),
            ..Self::default()
        }
    }
}

/// Payload for `POST /daily-log/briefing`.
#[derive(Debug, Clone, Serialize)]
pub struct NewBriefing {
    pub slot: BriefingSlot,
    pub content: String,
}

impl NewBriefing {
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::Validation(
                "briefing content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// True when `instant` falls on the same local calendar day as `now`.
pub fn same_local_day(instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    instant.with_timezone(&Local).date_naive() == now.with_timezone(&Local).date_naive()
}
