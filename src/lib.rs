//! vcc - Vector Command Center Library
//!
//! This library provides the client-side synchronization engine behind the
//! vcc CLI: a live view over a task/project/daily-log server reached through
//! HTTP and a push channel.
//!
//! # Core Concepts
//!
//! - **Snapshots**: immutable consolidated reads of tasks, sectors and
//!   today's log, derived fresh on every load
//! - **Invalidation events**: payload-less push signals meaning "reload"
//! - **Generations**: per-load counters that keep late stale responses from
//!   overwriting newer data
//! - **Optimistic mutations**: fire-and-forget writes reconciled by the
//!   next authoritative load
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.vcc.toml`
//! - `error`: Error types and result aliases
//! - `model`: Wire-level records and mutation payloads
//! - `remote`: HTTP client for the task/project/daily-log API
//! - `snapshot`: Snapshot loading and dashboard derivations
//! - `live`: Push channel with automatic reconnect
//! - `sync`: Poll + push coordination behind a generation gate
//! - `countdown`: Local focus-timer state machine
//! - `view`: Pure view projections
//! - `mutate`: Optimistic mutation gate
//! - `output`: Shared CLI output formatting

pub mod cli;
pub mod config;
pub mod countdown;
pub mod error;
pub mod live;
pub mod model;
pub mod mutate;
pub mod output;
pub mod remote;
pub mod snapshot;
pub mod sync;
pub mod view;

pub use error::{Error, Result};
