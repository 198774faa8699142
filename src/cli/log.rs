//! vcc log command implementations.

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::countdown::Countdown;
use crate::error::{Error, Result};
use crate::model::{BriefingSlot, DailyLog, DailyLogPatch, NewBriefing};
use crate::mutate::{settled, MutationGate};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::remote::{HistoryFilter, RemoteStore};

pub struct ShowOptions {
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct SetOptions {
    pub big_win: Option<String>,
    pub nudge: Option<String>,
    pub goals: Vec<String>,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct GoalOptions {
    pub goal: String,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct BriefingOptions {
    pub slot: String,
    pub content: String,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct HistoryOptions {
    pub page: usize,
    pub filter: String,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub async fn run_show(opts: ShowOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let log = store.daily_log().await?;

    let mut human = match &log {
        Some(log) => {
            let mut human = HumanOutput::new(format!("Daily log for {}", log.date));
            for line in log_lines(log) {
                human.push_detail(line);
            }
            human
        }
        None => HumanOutput::new("No daily log yet today"),
    };
    if log.is_none() {
        human.push_detail("record a briefing or a big win to start one".to_string());
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "log show",
        &log,
        Some(&human),
    )
}

pub async fn run_set(opts: SetOptions) -> Result<()> {
    if opts.big_win.is_none() && opts.nudge.is_none() && opts.goals.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to update; pass --big-win, --nudge or --goal".to_string(),
        ));
    }

    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    let patch = DailyLogPatch {
        big_win: opts.big_win.clone(),
        starting_nudge: opts.nudge.clone(),
        goals_for_tomorrow: if opts.goals.is_empty() {
            None
        } else {
            Some(opts.goals.clone())
        },
        reflections: None,
        timer_end: None,
    };

    if !settled(gate.update_daily_log(patch)).await {
        return Err(Error::OperationFailed(
            "daily log was not updated".to_string(),
        ));
    }

    #[derive(Serialize)]
    struct SetData<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        big_win: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        starting_nudge: Option<&'a str>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        goals_for_tomorrow: Vec<&'a str>,
    }

    let mut human = HumanOutput::new("Updated today's log");
    if let Some(big_win) = &opts.big_win {
        human.push_summary("Big win", big_win.clone());
    }
    if let Some(nudge) = &opts.nudge {
        human.push_summary("Starting nudge", nudge.clone());
    }
    if !opts.goals.is_empty() {
        human.push_summary("Goals", opts.goals.len().to_string());
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "log set",
        &SetData {
            big_win: opts.big_win.as_deref(),
            starting_nudge: opts.nudge.as_deref(),
            goals_for_tomorrow: opts.goals.iter().map(String::as_str).collect(),
        },
        Some(&human),
    )
}

pub async fn run_goal(opts: GoalOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    let handle = gate.mark_goal(opts.goal.clone())?;
    if !settled(handle).await {
        return Err(Error::OperationFailed(format!(
            "goal '{}' was not marked completed",
            opts.goal
        )));
    }

    #[derive(Serialize)]
    struct GoalData<'a> {
        goal: &'a str,
    }

    let human = HumanOutput::new(format!("Marked goal completed: {}", opts.goal));
    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "log goal",
        &GoalData { goal: &opts.goal },
        Some(&human),
    )
}

pub async fn run_briefing(opts: BriefingOptions) -> Result<()> {
    let slot: BriefingSlot = opts.slot.parse()?;

    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    let handle = gate.add_briefing(NewBriefing {
        slot,
        content: opts.content.clone(),
    })?;
    if !settled(handle).await {
        return Err(Error::OperationFailed(format!(
            "{slot} briefing was not recorded"
        )));
    }

    #[derive(Serialize)]
    struct BriefingData<'a> {
        slot: BriefingSlot,
        content: &'a str,
    }

    let human = HumanOutput::new(format!("Recorded {slot} briefing"));
    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "log briefing",
        &BriefingData {
            slot,
            content: &opts.content,
        },
        Some(&human),
    )
}

pub async fn run_history(opts: HistoryOptions) -> Result<()> {
    let filter: HistoryFilter = opts.filter.parse()?;
    let page_size = opts.config.briefings.page_size;

    let store = RemoteStore::new(&opts.config.remote)?;
    let history = store
        .briefing_history(filter, page_size, opts.page * page_size)
        .await?;

    let mut human = HumanOutput::new(format!("Mission archives, page {}", opts.page + 1));
    for log in &history {
        human.push_detail(format!("{}:", log.date));
        for line in log_lines(log) {
            human.push_detail(format!("  {line}"));
        }
    }
    if history.is_empty() {
        human.push_detail("no records on this page".to_string());
    }
    if history.len() < page_size {
        human.push_summary("Further pages", "none".to_string());
    } else {
        human.push_summary("Next page", format!("--page {}", opts.page + 1));
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "log history",
        &history,
        Some(&human),
    )
}

/// Render one daily log as indented detail lines.
pub(crate) fn log_lines(log: &DailyLog) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(big_win) = &log.big_win {
        lines.push(format!("big win: {big_win}"));
    }
    if let Some(nudge) = &log.starting_nudge {
        lines.push(format!("starting nudge: {nudge}"));
    }
    for slot in [
        BriefingSlot::Morning,
        BriefingSlot::Midday,
        BriefingSlot::Shutdown,
        BriefingSlot::Night,
    ] {
        if let Some(content) = log.slot_content(slot) {
            lines.push(format!("{slot}: {content}"));
        }
    }
    for goal in &log.goals_for_tomorrow {
        let mark = if log.is_goal_completed(goal) { "x" } else { " " };
        lines.push(format!("[{mark}] {goal}"));
    }
    if log.timer_end.is_some() {
        let countdown = Countdown::from_end(log.timer_end);
        lines.push(format!("timer: {}", countdown.display(Utc::now())));
    }
    lines
}
