//! vcc task command implementations.

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{NewTask, Status, Task};
use crate::mutate::{settled, MutationGate};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::remote::RemoteStore;
use crate::snapshot::build_snapshot;
use crate::view;

pub struct ListOptions {
    pub sector: Option<i64>,
    pub all: bool,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct AddOptions {
    pub title: String,
    pub sector: Option<i64>,
    pub priority: String,
    pub description: Option<String>,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatusOptions {
    pub id: i64,
    pub status: Option<String>,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct DeleteOptions {
    pub id: i64,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub async fn run_list(opts: ListOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let tasks = store.list_tasks().await?;
    let tasks = view::filter_by_project(&tasks, opts.sector);

    let (active, mut done) = view::split_done(&tasks);
    let snapshot = build_snapshot(active, Vec::new(), None, Utc::now());
    let active = snapshot.active_queue;
    done.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    #[derive(Serialize)]
    struct ListData {
        active: Vec<Task>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        done: Vec<Task>,
    }

    let data = ListData {
        active,
        done: if opts.all { done } else { Vec::new() },
    };

    let mut human = HumanOutput::new("Quests");
    human.push_summary("Active", data.active.len().to_string());
    if opts.all {
        human.push_summary("Done", data.done.len().to_string());
    }
    for task in &data.active {
        human.push_detail(task_line(task));
    }
    for task in &data.done {
        human.push_detail(format!("{} (done)", task_line(task)));
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task list",
        &data,
        Some(&human),
    )
}

pub async fn run_add(opts: AddOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    let new = NewTask {
        title: opts.title.clone(),
        description: opts.description,
        priority: opts.priority.parse()?,
        status: Status::Todo,
        project_id: opts.sector,
    };
    let handle = gate.create_task(new)?;
    if !settled(handle).await {
        return Err(Error::OperationFailed(format!(
            "quest '{}' was not created",
            opts.title
        )));
    }

    #[derive(Serialize)]
    struct AddData<'a> {
        title: &'a str,
        sector: Option<i64>,
    }

    let mut human = HumanOutput::new(format!("Created quest '{}'", opts.title));
    if let Some(sector) = opts.sector {
        human.push_summary("Sector", sector.to_string());
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task add",
        &AddData {
            title: &opts.title,
            sector: opts.sector,
        },
        Some(&human),
    )
}

pub async fn run_status(opts: StatusOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;

    let status = match &opts.status {
        Some(status) => status.parse()?,
        None => {
            let tasks = store.list_tasks().await?;
            let current = tasks
                .iter()
                .find(|task| task.id == opts.id)
                .ok_or_else(|| Error::InvalidArgument(format!("quest not found: {}", opts.id)))?;
            current.status.next()
        }
    };

    let gate = MutationGate::new(store);
    if !settled(gate.set_status(opts.id, status)).await {
        return Err(Error::OperationFailed(format!(
            "status of quest {} was not updated",
            opts.id
        )));
    }

    #[derive(Serialize)]
    struct StatusData {
        id: i64,
        status: Status,
    }

    let human = HumanOutput::new(format!("Quest {} is now {status}", opts.id));
    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task status",
        &StatusData {
            id: opts.id,
            status,
        },
        Some(&human),
    )
}

pub async fn run_delete(opts: DeleteOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    if !settled(gate.delete_task(opts.id)).await {
        return Err(Error::OperationFailed(format!(
            "quest {} was not deleted",
            opts.id
        )));
    }

    #[derive(Serialize)]
    struct DeleteData {
        id: i64,
    }

    let human = HumanOutput::new(format!("Deleted quest {}", opts.id));
    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "task delete",
        &DeleteData { id: opts.id },
        Some(&human),
    )
}

pub(crate) fn task_line(task: &Task) -> String {
    let mut line = format!(
        "#{} [{}] {} {}",
        task.id, task.priority, task.status, task.title
    );
    if task.nudge_count > 0 {
        line.push_str(&format!(" ({} nudges)", task.nudge_count));
    }
    line
}
