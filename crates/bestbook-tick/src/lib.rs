//! Fixed-period check scheduler for Bestbook.
//!
//! Drives "do this every N seconds" loops, such as re-validating the stored
//! session token. Supports an immediate first tick, pause/resume, and a
//! policy for ticks missed while the process was suspended (a laptop lid
//! closed, a backgrounded tab).
//!
//! # Integration
//!
//! The scheduler is designed to sit inside a task's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = shutdown.changed() => break,
//!         info = scheduler.wait_for_tick() => {
//!             run_check(info.tick);
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do after waking up later than scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissedTickPolicy {
    /// Forget the missed ticks and schedule the next one a full period
    /// from now. One check after a long sleep is enough.
    #[default]
    Skip,
    /// Keep the original cadence: the next tick is due one period after
    /// the *scheduled* time, so a late tick may be followed quickly by
    /// another.
    Fixed,
}

/// Configuration for [`TickScheduler`].
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks.
    pub period: Duration,
    /// Fire the first tick right away instead of one period from now.
    pub immediate_first_tick: bool,
    /// Missed-tick handling.
    pub policy: MissedTickPolicy,
    /// Collect [`TickMetrics`]. Cheap; off only for noise-free tests.
    pub metrics_enabled: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(30),
            immediate_first_tick: true,
            policy: MissedTickPolicy::default(),
            metrics_enabled: true,
        }
    }
}

impl TickConfig {
    /// Shortest period accepted. Anything faster is a busy loop.
    pub const MIN_PERIOD: Duration = Duration::from_millis(10);

    /// Create a config for a specific period with default settings.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_ms = self.period.as_millis() as u64,
                min_ms = Self::MIN_PERIOD.as_millis() as u64,
                "tick period below minimum, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// How far past its deadline this tick fired.
    pub late_by: Duration,
    /// Whole periods that were skipped because of lateness (0 normally).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Runtime counters for the scheduler.
#[derive(Debug, Clone, Default)]
pub struct TickMetrics {
    pub total_ticks: u64,
    /// Ticks that fired more than 10% of a period late.
    pub late_ticks: u64,
    pub total_skipped: u64,
    /// Worst lateness seen so far.
    pub max_late_by: Duration,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period tick scheduler. One per polling loop.
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// When the next tick should fire.
    next_tick: Instant,
    paused: bool,
    metrics: TickMetrics,
}

impl TickScheduler {
    /// Create a new scheduler from config. The clock starts now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let now = Instant::now();
        let next_tick = if config.immediate_first_tick {
            now
        } else {
            now + config.period
        };

        debug!(
            period_ms = config.period.as_millis() as u64,
            immediate = config.immediate_first_tick,
            policy = ?config.policy,
            "tick scheduler created"
        );

        Self {
            config,
            tick_count: 0,
            next_tick,
            paused: false,
            metrics: TickMetrics::default(),
        }
    }

    /// Create a scheduler for a specific period with default settings.
    pub fn every(period: Duration) -> Self {
        Self::new(TickConfig::every(period))
    }

    /// Wait until the next tick is due.
    ///
    /// While paused this future pends forever; `tokio::select!` still
    /// services other branches. Cancel-safe: dropping the future before it
    /// resolves does not consume a tick.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        if self.paused {
            std::future::pending::<()>().await;
        }

        let due = self.next_tick;
        time::sleep_until(due).await;

        let now = Instant::now();
        let period = self.config.period;
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(due);
        let late = late_by > period / 10;
        let skipping = late && self.config.policy == MissedTickPolicy::Skip;
        let ticks_skipped = if skipping {
            (late_by.as_nanos() / period.as_nanos()) as u64
        } else {
            0
        };

        self.next_tick = match self.config.policy {
            MissedTickPolicy::Skip => {
                if ticks_skipped > 0 {
                    warn!(
                        tick = self.tick_count,
                        skipped = ticks_skipped,
                        late_ms = late_by.as_millis() as u64,
                        "tick fired late, skipping missed periods"
                    );
                }
                now + period
            }
            MissedTickPolicy::Fixed => due + period,
        };

        if self.config.metrics_enabled {
            self.metrics.total_ticks += 1;
            self.metrics.total_skipped += ticks_skipped;
            if late {
                self.metrics.late_ticks += 1;
            }
            if late_by > self.metrics.max_late_by {
                self.metrics.max_late_by = late_by;
            }
        }

        trace!(tick = self.tick_count, late, "tick fired");

        TickInfo {
            tick: self.tick_count,
            late_by,
            ticks_skipped,
        }
    }

    /// Pause ticking. Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(tick = self.tick_count, "tick scheduler paused");
        }
    }

    /// Resume after a pause.
    ///
    /// The next tick is due one full period after resuming, so time spent
    /// paused never produces a burst.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.next_tick = Instant::now() + self.config.period;
            debug!(tick = self.tick_count, "tick scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.config.period
    }
}
