//! Command-line interface for vcc
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

mod dashboard;
mod log;
mod sector;
mod task;
mod timer;

/// vcc - Vector Command Center
///
/// A live client for the Vector Tasks API: dashboard snapshots with push
/// invalidation, quest and sector management, daily logs and the focus
/// timer.
#[derive(Parser, Debug)]
#[command(name = "vcc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the Vector Tasks API (overrides .vcc.toml)
    #[arg(long, global = true, env = "VCC_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to a configuration file (defaults to ./.vcc.toml)
    #[arg(long, global = true, env = "VCC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the dashboard snapshot (momentum, sectors, active quests)
    Dashboard {
        /// Keep running: follow push invalidations and the poll interval
        #[arg(long)]
        watch: bool,

        /// Only show quests for one sector id
        #[arg(long)]
        sector: Option<i64>,
    },

    /// Quest management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Sector management
    #[command(subcommand)]
    Sector(SectorCommands),

    /// Daily log and briefings
    #[command(subcommand)]
    Log(LogCommands),

    /// Focus timer
    #[command(subcommand)]
    Timer(TimerCommands),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List quests in dashboard order
    List {
        /// Only show quests for one sector id
        #[arg(long)]
        sector: Option<i64>,

        /// Include quests already done
        #[arg(long)]
        all: bool,
    },

    /// Create a quest
    Add {
        /// Quest title
        title: String,

        /// Owning sector id
        #[arg(long)]
        sector: Option<i64>,

        /// Priority: Low, Med, High
        #[arg(long, default_value = "Med")]
        priority: String,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// Set a quest's status: Todo, Working, Done
    Status {
        /// Quest id
        id: i64,

        /// New status, or omit to cycle Todo -> Working -> Done -> Todo
        status: Option<String>,
    },

    /// Delete a quest
    Delete {
        /// Quest id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum SectorCommands {
    /// List sectors with active quest counts, sub-sectors under parents
    List,

    /// Create a sector
    Add {
        /// Sector name
        name: String,

        /// Parent sector id (one nesting level)
        #[arg(long)]
        parent: Option<i64>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,

        /// Category label
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a sector (sub-sectors cascade server-side)
    Delete {
        /// Sector id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show today's daily log
    Show,

    /// Update fields of today's daily log
    Set {
        /// The day's primary objective
        #[arg(long)]
        big_win: Option<String>,

        /// Starting nudge shown with the morning briefing
        #[arg(long)]
        nudge: Option<String>,

        /// Replace the goals-for-tomorrow list (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
    },

    /// Mark one goal as completed
    Goal {
        /// The goal text exactly as listed
        goal: String,
    },

    /// Record a briefing: Morning, Midday, Shutdown, Night
    Briefing {
        /// Briefing slot
        slot: String,

        /// Briefing content
        content: String,
    },

    /// Browse historical daily logs, most recent first
    History {
        /// Page number, starting at 0
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Filter: all, morning, night
        #[arg(long, default_value = "all")]
        filter: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimerCommands {
    /// Start a countdown, ticking locally before the server confirms
    Start {
        /// Duration in minutes
        minutes: i64,
    },

    /// Stop the countdown
    Stop,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.dispatch())
    }

    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_from_dir(Path::new(".")),
        };
        if let Some(base_url) = &self.base_url {
            config.remote.base_url = base_url.clone();
        }
        Ok(config)
    }

    async fn dispatch(self) -> Result<()> {
        let config = self.load_config()?;
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Dashboard { watch, sector } => {
                dashboard::run(dashboard::DashboardOptions {
                    watch,
                    sector,
                    config,
                    json,
                    quiet,
                })
                .await
            }
            Commands::Task(cmd) => match cmd {
                TaskCommands::List { sector, all } => {
                    task::run_list(task::ListOptions {
                        sector,
                        all,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                TaskCommands::Add {
                    title,
                    sector,
                    priority,
                    description,
                } => {
                    task::run_add(task::AddOptions {
                        title,
                        sector,
                        priority,
                        description,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                TaskCommands::Status { id, status } => {
                    task::run_status(task::StatusOptions {
                        id,
                        status,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                TaskCommands::Delete { id } => {
                    task::run_delete(task::DeleteOptions {
                        id,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
            },
            Commands::Sector(cmd) => match cmd {
                SectorCommands::List => {
                    sector::run_list(sector::ListOptions {
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                SectorCommands::Add {
                    name,
                    parent,
                    description,
                    category,
                } => {
                    sector::run_add(sector::AddOptions {
                        name,
                        parent,
                        description,
                        category,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                SectorCommands::Delete { id } => {
                    sector::run_delete(sector::DeleteOptions {
                        id,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
            },
            Commands::Log(cmd) => match cmd {
                LogCommands::Show => {
                    log::run_show(log::ShowOptions {
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                LogCommands::Set {
                    big_win,
                    nudge,
                    goals,
                } => {
                    log::run_set(log::SetOptions {
                        big_win,
                        nudge,
                        goals,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                LogCommands::Goal { goal } => {
                    log::run_goal(log::GoalOptions {
                        goal,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                LogCommands::Briefing { slot, content } => {
                    log::run_briefing(log::BriefingOptions {
                        slot,
                        content,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                LogCommands::History { page, filter } => {
                    log::run_history(log::HistoryOptions {
                        page,
                        filter,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
            },
            Commands::Timer(cmd) => match cmd {
                TimerCommands::Start { minutes } => {
                    timer::run_start(timer::StartOptions {
                        minutes,
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
                TimerCommands::Stop => {
                    timer::run_stop(timer::StopOptions {
                        config,
                        json,
                        quiet,
                    })
                    .await
                }
            },
        }
    }
}
