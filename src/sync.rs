//! Snapshot synchronization and view-state reconciliation.
//!
//! A coordinator task multiplexes every reload trigger - the fixed-interval
//! poll, push invalidations, reconnect edges and manual refresh requests -
//! into generation-stamped loads. Loads may overlap and complete out of
//! order; the [`Reconciler`] gate guarantees the published view state always
//! reflects the newest *started* load that has completed, never a stale
//! response arriving late.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::SyncConfig;
use crate::live::LiveChannel;
use crate::snapshot::{Snapshot, SnapshotLoader};

const REFRESH_BUFFER: usize = 4;
const RESULT_BUFFER: usize = 8;

/// Generation gate: only ever accepts data from a newer load than the last
/// one applied, discarding late-arriving stale responses.
#[derive(Debug, Default)]
pub struct Reconciler {
    started: u64,
    applied: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new load. Generations increase monotonically from 1.
    pub fn begin(&mut self) -> u64 {
        self.started += 1;
        self.started
    }

    /// True when `generation` is newer than everything applied so far; the
    /// caller must publish the result exactly when this returns true.
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation > self.applied {
            self.applied = generation;
            true
        } else {
            false
        }
    }
}

/// Scoped handle to a running synchronization loop. Dropping it (or calling
/// [`shutdown`]) aborts the coordinator and everything it owns, including
/// the push channel.
///
/// [`shutdown`]: SyncHandle::shutdown
#[derive(Debug)]
pub struct SyncHandle {
    snapshots: watch::Receiver<Arc<Snapshot>>,
    connected: watch::Receiver<bool>,
    refresh_tx: mpsc::Sender<()>,
    coordinator: JoinHandle<()>,
}

impl SyncHandle {
    /// Latest accepted snapshot; starts at the defined empty state.
    pub fn snapshots(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.clone()
    }

    /// Push-channel connection state for the status indicator.
    pub fn connected(&self) -> watch::Receiver<bool> {
        self.connected.clone()
    }

    /// Request one fresh load, e.g. after a mutation settles on a
    /// deployment without push notifications.
    pub async fn refresh(&self) {
        let _ = self.refresh_tx.send(()).await;
    }

    pub fn shutdown(self) {
        self.coordinator.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.coordinator.abort();
    }
}

/// Start the synchronization loop. `live` is optional so deployments
/// without a push endpoint degrade to pure polling.
pub fn spawn(loader: SnapshotLoader, live: Option<LiveChannel>, sync: &SyncConfig) -> SyncHandle {
    let (snapshot_tx, snapshots) = watch::channel(Arc::new(Snapshot::empty(Utc::now())));
    let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_BUFFER);
    let connected = match &live {
        Some(channel) => channel.connected(),
        None => watch::channel(false).1,
    };
    let poll = Duration::from_secs(sync.poll_interval_secs);
    let coordinator = tokio::spawn(coordinate(loader, live, poll, snapshot_tx, refresh_rx));
    SyncHandle {
        snapshots,
        connected,
        refresh_tx,
        coordinator,
    }
}

async fn coordinate(
    loader: SnapshotLoader,
    mut live: Option<LiveChannel>,
    poll: Duration,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    mut refresh_rx: mpsc::Receiver<()>,
) {
    let mut reconciler = Reconciler::new();
    let (results_tx, mut results_rx) = mpsc::channel::<(u64, Snapshot)>(RESULT_BUFFER);

    let mut connected = live.as_ref().map(|channel| channel.connected());
    let mut live_open = live.is_some();
    let mut connected_open = connected.is_some();

    // first tick fires immediately and doubles as the initial load
    let mut poll_timer = tokio::time::interval(poll);
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = poll_timer.tick() => {
                start_load(&loader, &mut reconciler, &results_tx);
            }
            Some(()) = refresh_rx.recv() => {
                start_load(&loader, &mut reconciler, &results_tx);
            }
            event = next_event(live.as_mut()), if live_open => {
                match event {
                    Some(()) => start_load(&loader, &mut reconciler, &results_tx),
                    None => live_open = false,
                }
            }
            edge = reconnect_edge(connected.as_mut()), if connected_open => {
                match edge {
                    // the channel replays nothing, so close the gap with a
                    // fresh load on every reconnect
                    Some(true) => start_load(&loader, &mut reconciler, &results_tx),
                    Some(false) => {}
                    None => connected_open = false,
                }
            }
            Some((generation, snapshot)) = results_rx.recv() => {
                if reconciler.accept(generation) {
                    let _ = snapshot_tx.send(Arc::new(snapshot));
                }
            }
        }
    }
}

fn start_load(
    loader: &SnapshotLoader,
    reconciler: &mut Reconciler,
    results_tx: &mpsc::Sender<(u64, Snapshot)>,
) {
    let generation = reconciler.begin();
    let loader = loader.clone();
    let results_tx = results_tx.clone();
    tokio::spawn(async move {
        let snapshot = loader.load().await;
        let _ = results_tx.send((generation, snapshot)).await;
    });
}

async fn next_event(live: Option<&mut LiveChannel>) -> Option<()> {
    match live {
        Some(channel) => channel.recv().await,
        None => std::future::pending().await,
    }
}

async fn reconnect_edge(connected: Option<&mut watch::Receiver<bool>>) -> Option<bool> {
    match connected {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(*rx.borrow_and_update()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}
