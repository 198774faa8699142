//! Local focus-timer countdown.
//!
//! Two states: Idle (no end instant) and Running. The display is recomputed
//! from wall clock on every tick, clamps at zero and holds at `00:00` once
//! the end instant has passed; clearing the end instant is always an
//! explicit caller action. Tick cadence is owned by the consuming view and
//! is independent of snapshot churn: `sync_end` reports whether the end
//! instant actually changed so only a real change restarts a ticker.

use chrono::{DateTime, Duration, Utc};

pub const IDLE_DISPLAY: &str = "--:--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    end: Option<DateTime<Utc>>,
}

impl Countdown {
    pub fn idle() -> Self {
        Self { end: None }
    }

    pub fn from_end(end: Option<DateTime<Utc>>) -> Self {
        Self { end }
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_running(&self) -> bool {
        self.end.is_some()
    }

    /// Optimistically start ticking from `duration` ahead of `now`, before
    /// the server has confirmed persistence. Returns the end instant for the
    /// persistence call; on failure the caller rolls back with [`clear`].
    pub fn start(&mut self, now: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
        let end = now + duration;
        self.end = Some(end);
        end
    }

    /// Back to Idle. Used both for explicit stops and for rollback when
    /// persistence fails.
    pub fn clear(&mut self) {
        self.end = None;
    }

    /// Adopt the authoritative end instant from a fresh snapshot. Returns
    /// true only when the instant actually changed.
    pub fn sync_end(&mut self, end: Option<DateTime<Utc>>) -> bool {
        if self.end == end {
            return false;
        }
        self.end = end;
        true
    }

    /// Remaining time clamped at zero; `None` while Idle.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.end.map(|end| (end - now).max(Duration::zero()))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.remaining(now), Some(left) if left == Duration::zero())
    }

    /// `mm:ss` while running, `--:--` while Idle, holding at `00:00` once
    /// expired.
    pub fn display(&self, now: DateTime<Utc>) -> String {
        match self.remaining(now) {
            None => IDLE_DISPLAY.to_string(),
            Some(left) => {
                let total = left.num_seconds();
                format!("{:02}:{:02}", total / 60, total % 60)
            }
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::idle()
    }
}
