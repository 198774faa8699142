//! vcc sector command implementations.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::NewProject;
use crate::mutate::{settled, MutationGate};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::remote::RemoteStore;
use crate::snapshot::build_snapshot;
use crate::view;

pub struct ListOptions {
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

pub struct AddOptions {
    pub name: String,
    pub parent: Option<i64>,
    pub description: Option<String>,
    pub category: Option<String>,
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
    let (tasks, projects) = tokio::try_join!(store.list_tasks(), store.list_projects())?;

    let snapshot = build_snapshot(tasks, projects.clone(), None, Utc::now());
    let counts: HashMap<i64, usize> = snapshot
        .projects
        .iter()
        .map(|sector| (sector.project.id, sector.active_count))
        .collect();

    #[derive(Serialize)]
    struct SectorRow {
        id: i64,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_id: Option<i64>,
        active_count: usize,
    }

    let ordered: Vec<SectorRow> = view::group_projects(&projects)
        .into_iter()
        .map(|project| SectorRow {
            active_count: counts.get(&project.id).copied().unwrap_or(0),
            id: project.id,
            name: project.name,
            parent_id: project.parent_id,
        })
        .collect();

    let mut human = HumanOutput::new("Sectors");
    human.push_summary("Total", ordered.len().to_string());
    for row in &ordered {
        let indent = if row.parent_id.is_some() { "  " } else { "" };
        human.push_detail(format!(
            "{indent}#{} {} - {} active",
            row.id, row.name, row.active_count
        ));
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "sector list",
        &ordered,
        Some(&human),
    )
}

pub async fn run_add(opts: AddOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    let new = NewProject {
        name: opts.name.clone(),
        description: opts.description,
        category: opts.category,
        parent_id: opts.parent,
    };
    let handle = gate.create_project(new)?;
    if !settled(handle).await {
        return Err(Error::OperationFailed(format!(
            "sector '{}' was not created",
            opts.name
        )));
    }

    #[derive(Serialize)]
    struct AddData<'a> {
        name: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_id: Option<i64>,
    }

    let mut human = HumanOutput::new(format!("Created sector '{}'", opts.name));
    if let Some(parent) = opts.parent {
        human.push_summary("Parent", parent.to_string());
    }

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "sector add",
        &AddData {
            name: &opts.name,
            parent_id: opts.parent,
        },
        Some(&human),
    )
}

pub async fn run_delete(opts: DeleteOptions) -> Result<()> {
    let store = RemoteStore::new(&opts.config.remote)?;
    let gate = MutationGate::new(store);

    if !settled(gate.delete_project(opts.id)).await {
        return Err(Error::OperationFailed(format!(
            "sector {} was not deleted",
            opts.id
        )));
    }

    #[derive(Serialize)]
    struct DeleteData {
        id: i64,
    }

    let mut human = HumanOutput::new(format!("Deleted sector {}", opts.id));
    human.push_warning("sub-sectors of this sector are removed as well".to_string());

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "sector delete",
        &DeleteData { id: opts.id },
        Some(&human),
    )
}
