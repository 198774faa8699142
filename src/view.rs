//! Pure view projections over snapshot data.
//!
//! No side effects, no network access; every function derives a rendering
//! order from an already-loaded slice.

use crate::model::{DailyLog, Project, ProjectId, Task};

/// Tasks belonging to one sector, or all tasks when no sector is selected.
pub fn filter_by_project(tasks: &[Task], project_id: Option<ProjectId>) -> Vec<Task> {
    match project_id {
        None => tasks.to_vec(),
        Some(id) => tasks
            .iter()
            .filter(|task| task.project_id == Some(id))
            .cloned()
            .collect(),
    }
}

/// Partition into (active, done), preserving order within each half.
pub fn split_done(tasks: &[Task]) -> (Vec<Task>, Vec<Task>) {
    tasks
        .iter()
        .cloned()
        .partition(|task| !task.status.is_done())
}

/// Sectors in display order: top-level sectors alphabetically, each
/// immediately followed by its sub-sectors, also alphabetically.
///
/// Exactly one level of nesting is supported; a sub-sector whose parent has
/// its own parent still sorts under its immediate parent. A sub-sector whose
/// parent is absent from the input is treated as top-level.
pub fn group_projects(projects: &[Project]) -> Vec<Project> {
    let known: Vec<ProjectId> = projects.iter().map(|project| project.id).collect();

    let mut top_level: Vec<&Project> = projects
        .iter()
        .filter(|project| match project.parent_id {
            None => true,
            Some(parent) => !known.contains(&parent),
        })
        .collect();
    top_level.sort_by(|a, b| a.name.cmp(&b.name));

    let mut ordered = Vec::with_capacity(projects.len());
    for parent in top_level {
        ordered.push(parent.clone());
        let mut children: Vec<&Project> = projects
            .iter()
            .filter(|project| project.parent_id == Some(parent.id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        ordered.extend(children.into_iter().cloned());
    }
    ordered
}

/// Offset/limit window into an already-fetched briefing history. A returned
/// page shorter than `page_size` means there is no further page.
pub fn paginate_briefings(history: &[DailyLog], page: usize, page_size: usize) -> &[DailyLog] {
    let start = page.saturating_mul(page_size).min(history.len());
    let end = start.saturating_add(page_size).min(history.len());
    &history[start..end]
}
