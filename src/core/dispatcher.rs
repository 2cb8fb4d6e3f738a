//! # Dispatcher: the service's single control loop.
//!
//! Owns the only places that sleep, talk to the sink, and observe
//! cancellation. Each loop iteration moves through an explicit state machine:
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!   Idle ──► scheduler.plan(now)                            │
//!   │          ├─ Ok(plan)  ─► Waiting(plan)                │
//!   │          └─ Err(e)    ─► Deferred(retry_interval) ────┤ (sleep, cancellable)
//!   │                                                       │
//!   Waiting(plan) ── select! ─┬─ timer hits plan.wake_at ─► Firing(plan)
//!                             └─ token cancelled ─────────► Terminating
//!                                                           │
//!   Firing(plan) ─► sink.write(batch) (awaited, never cancelled)
//!                   ├─ Ok  ─► publish WriteSucceeded        │
//!                   └─ Err ─► publish WriteFailed           │
//!                   ├─ pair mode ─► CoolingDown(cooldown) ──┤ (sleep, cancellable)
//!                   └─ otherwise ─────────────────────────► Idle
//!
//!   Terminating ─► publish DispatcherStopped, return
//! ```
//!
//! ## Rules
//! - At most **one** pending plan; missed events are never replayed
//! - Each plan is consumed once: the next plan starts strictly after the last fired wake-up,
//!   even if the clock has not moved past it
//! - A wake target at or before `now` fires immediately
//! - Waits re-read the wall clock after the timer and sleep again if it is still early
//! - Write errors are published and swallowed; the next natural cycle is the retry
//! - Cancellation is observed only while waiting; an in-flight write always completes

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use crate::{
    config::Config,
    events::{Bus, Event, EventKind},
    schedule::{Plan, ScheduleMode, Scheduler},
    sink::{Batch, SinkRef},
};

/// Loop parameters extracted from [`Config`].
#[derive(Clone, Debug)]
pub struct DispatcherParams {
    /// Single event or sunrise+sunset pair per wake-up.
    pub mode: ScheduleMode,
    /// Database stamped on every batch.
    pub database: String,
    /// Pause after each dispatch (`None` = go straight back to idle).
    pub cooldown: Option<Duration>,
    /// Wait before recomputing when nothing could be scheduled.
    pub retry_interval: Duration,
}

impl DispatcherParams {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            mode: cfg.mode,
            database: cfg.sink.database.clone(),
            cooldown: cfg.effective_cooldown(),
            retry_interval: cfg.retry_interval,
        }
    }
}

/// Dispatcher states. Each variant owns what its step needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// No pending plan; ask the scheduler.
    Idle,
    /// Holding one plan until its wake-up instant.
    Waiting(Plan),
    /// Wake-up reached; submit the batch.
    Firing(Plan),
    /// Pausing after a dispatch.
    CoolingDown(Duration),
    /// Nothing schedulable; pausing before asking again.
    Deferred(Duration),
    /// Cancellation observed; leave the loop.
    Terminating,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => f.write_str("idle"),
            State::Waiting(plan) => write!(f, "waiting({plan})"),
            State::Firing(plan) => write!(f, "firing({plan})"),
            State::CoolingDown(d) => write!(f, "cooling-down({d:?})"),
            State::Deferred(d) => write!(f, "deferred({d:?})"),
            State::Terminating => f.write_str("terminating"),
        }
    }
}

/// Drives scheduler → wait → sink until cancelled.
pub struct Dispatcher<Tz: TimeZone = Local> {
    scheduler: Scheduler<Tz>,
    sink: SinkRef,
    clock: Arc<dyn Clock>,
    bus: Bus,
    params: DispatcherParams,
    /// Wake-up instant of the last plan that fired.
    last_fired: Option<DateTime<Utc>>,
}

impl<Tz> Dispatcher<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
{
    pub fn new(
        scheduler: Scheduler<Tz>,
        sink: SinkRef,
        clock: Arc<dyn Clock>,
        bus: Bus,
        params: DispatcherParams,
    ) -> Self {
        Self {
            scheduler,
            sink,
            clock,
            bus,
            params,
            last_fired: None,
        }
    }

    /// Runs the loop until `token` is cancelled.
    ///
    /// Returns only through [`State::Terminating`]; no sink error ever ends the loop.
    pub async fn run(mut self, token: CancellationToken) {
        let mut state = State::Idle;
        loop {
            state = self.step(state, &token).await;
            if state == State::Terminating {
                break;
            }
        }
        self.bus.publish(Event::new(EventKind::DispatcherStopped));
    }

    /// Performs one transition.
    pub async fn step(&mut self, state: State, token: &CancellationToken) -> State {
        match state {
            State::Idle => self.schedule(),
            State::Waiting(plan) => {
                if self.sleep_until(plan.wake_at, token).await {
                    State::Firing(plan)
                } else {
                    State::Terminating
                }
            }
            State::Firing(plan) => self.fire(plan).await,
            State::CoolingDown(d) | State::Deferred(d) => {
                if self.sleep_for(d, token).await {
                    State::Idle
                } else {
                    State::Terminating
                }
            }
            State::Terminating => State::Terminating,
        }
    }

    /// Idle: computes the next plan, or defers when there is none.
    fn schedule(&self) -> State {
        let now = self.clock.now();
        let from = match self.last_fired {
            Some(fired) if fired >= now => fired + TimeDelta::nanoseconds(1),
            _ => now,
        };
        match self.scheduler.plan(self.params.mode, from) {
            Ok(plan) => {
                self.bus.publish(
                    Event::new(EventKind::PlanScheduled)
                        .with_label(plan.to_string())
                        .with_instant(plan.wake_at)
                        .with_delay(until(now, plan.wake_at)),
                );
                State::Waiting(plan)
            }
            Err(e) => {
                self.bus.publish(
                    Event::new(EventKind::NothingScheduled)
                        .with_reason(e.to_string())
                        .with_delay(self.params.retry_interval),
                );
                State::Deferred(self.params.retry_interval)
            }
        }
    }

    /// Firing: one write, outcome published, never propagated.
    async fn fire(&mut self, plan: Plan) -> State {
        self.last_fired = Some(plan.wake_at);
        let batch = Batch::for_events(self.params.database.as_str(), &plan.events);
        let label = plan.to_string();

        self.bus.publish(
            Event::new(EventKind::Inserting)
                .with_label(label.as_str())
                .with_instant(plan.wake_at)
                .with_points(batch.len())
                .with_sink(self.sink.name()),
        );

        match self.sink.write(&batch).await {
            Ok(()) => self.bus.publish(
                Event::new(EventKind::WriteSucceeded)
                    .with_label(label.as_str())
                    .with_sink(self.sink.name()),
            ),
            Err(e) => self.bus.publish(
                Event::new(EventKind::WriteFailed)
                    .with_label(label.as_str())
                    .with_sink(self.sink.name())
                    .with_reason(e.to_string()),
            ),
        }

        match self.params.cooldown {
            Some(d) => {
                self.bus
                    .publish(Event::new(EventKind::CooldownStarted).with_delay(d));
                State::CoolingDown(d)
            }
            None => State::Idle,
        }
    }

    /// Sleeps until the wall clock reaches `target`. Returns `false` if cancelled first.
    async fn sleep_until(&self, target: DateTime<Utc>, token: &CancellationToken) -> bool {
        loop {
            if token.is_cancelled() {
                return false;
            }
            let remaining = until(self.clock.now(), target);
            if remaining.is_zero() {
                return true;
            }
            let sleep = time::sleep(remaining);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = token.cancelled() => return false,
                _ = &mut sleep => {}
            }
        }
    }

    /// Sleeps for `d`. Returns `false` if cancelled first.
    async fn sleep_for(&self, d: Duration, token: &CancellationToken) -> bool {
        select! {
            biased;
            _ = token.cancelled() => false,
            _ = time::sleep(d) => true,
        }
    }
}

/// Non-negative time from `now` to `target`.
fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}
