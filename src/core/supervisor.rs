//! # Supervisor: owns the corridor, spawns the actors, ends the run.
//!
//! The [`Supervisor`] owns the event bus, the [`SubscriberSet`], the shared
//! [`Corridor`] and the run configuration. One call to [`Supervisor::run`]
//! is one complete simulation:
//!
//! ```text
//! run():
//!   - spawn `crossers` Crosser actors + `monitors` Monitor actors
//!       └─► each gets runtime_token.child_token(), joined via JoinSet
//!   - drive():
//!       ├─ run_for deadline elapses / OS signal ──► publish ShutdownRequested
//!       │      └─► token.cancel() ─► join all ─► publish AllStopped ─► Ok
//!       └─ an actor returns Err (alarm / pile-up / primitive failure)
//!              └─► token.cancel() ─► join all ─► Err (abnormal exit)
//!   - SubscriberSet::shutdown(): flush the trace before returning
//! ```
//!
//! ## Rules
//! - Actors observe cancellation at loop-top only; the join waits for each
//!   one to finish its current full cycle. There is no grace timeout: an
//!   actor permanently blocked on a zero-capacity corridor hangs the join,
//!   which is an accepted misconfiguration, not a handled failure.
//! - Alarm termination is cooperative: the detecting actor returns its error
//!   and the supervisor cancels everyone, so the corridor is torn down
//!   cleanly while the observable exit status stays abnormal.

use std::sync::Arc;

use tokio::{task::JoinSet, time};
use tokio_util::sync::CancellationToken;

use crate::config::SimConfig;
use crate::core::corridor::Corridor;
use crate::core::crosser::Crosser;
use crate::core::monitor::Monitor;
use crate::core::shutdown;
use crate::delay::{DelaySource, UniformDelay};
use crate::error::SimError;
use crate::events::{Bus, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Coordinates the crossers, the monitors, and cooperative shutdown.
pub struct Supervisor {
    /// Run configuration.
    pub cfg: SimConfig,
    /// Event bus shared with all actors.
    pub bus: Bus,
    /// Delivery worker for subscribers.
    pub subs: SubscriberSet,
    /// The shared corridor; inspectable after the run for accounting.
    pub corridor: Arc<Corridor>,

    delay: Arc<dyn DelaySource>,
}

impl Supervisor {
    /// Creates a supervisor with the given config and subscribers.
    pub fn new(cfg: SimConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(subscribers, &bus);
        let corridor = Arc::new(Corridor::new(cfg.capacity, cfg.one_way));
        Self {
            cfg,
            bus,
            subs,
            corridor,
            delay: Arc::new(UniformDelay),
        }
    }

    /// Replaces the delay source (deterministic sources for tests/demos).
    pub fn with_delay(mut self, delay: Arc<dyn DelaySource>) -> Self {
        self.delay = delay;
        self
    }

    /// Runs one complete simulation.
    ///
    /// Returns `Ok(())` after the timed run completes and every actor has
    /// joined, or the first actor error after an alarm-triggered abort.
    pub async fn run(&self) -> Result<(), SimError> {
        let token = CancellationToken::new();
        let mut set = JoinSet::new();
        self.spawn_actors(&mut set, &token);
        let res = self.drive(&mut set, &token).await;

        // Flush the trace; the tail (alarm diagnostics, AllStopped) must be
        // delivered before the caller can exit the process.
        self.subs.shutdown().await;
        res
    }

    /// Spawns every crosser and monitor with a distinct ordinal identity.
    fn spawn_actors(&self, set: &mut JoinSet<Result<(), SimError>>, token: &CancellationToken) {
        for id in 0..self.cfg.crossers {
            let crosser = Crosser::new(
                id,
                Arc::clone(&self.corridor),
                self.cfg.clone(),
                self.bus.clone(),
                Arc::clone(&self.delay),
            );
            set.spawn(crosser.run(token.child_token()));
        }
        for id in 0..self.cfg.monitors {
            let monitor = Monitor::new(
                id,
                Arc::clone(&self.corridor),
                self.cfg.clone(),
                self.bus.clone(),
                Arc::clone(&self.delay),
            );
            set.spawn(monitor.run(token.child_token()));
        }
    }

    /// Waits for the run deadline, an OS signal, or an actor failure.
    async fn drive(
        &self,
        set: &mut JoinSet<Result<(), SimError>>,
        token: &CancellationToken,
    ) -> Result<(), SimError> {
        // A signal ends the run early through the same path as the deadline.
        let stop = CancellationToken::new();
        {
            let stop = stop.clone();
            tokio::spawn(async move {
                if shutdown::wait_for_shutdown_signal().await.is_ok() {
                    stop.cancel();
                }
            });
        }

        let deadline = time::sleep(self.cfg.run_for);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    self.bus.publish_kind(EventKind::ShutdownRequested);
                    token.cancel();
                    return self.join_all(set).await;
                }
                _ = stop.cancelled() => {
                    self.bus.publish_kind(EventKind::ShutdownRequested);
                    token.cancel();
                    return self.join_all(set).await;
                }
                res = set.join_next() => match res {
                    Some(Ok(Err(e))) => {
                        // Alarm or primitive failure: abort the run
                        // cooperatively instead of exiting from the worker.
                        token.cancel();
                        let _ = self.join_all(set).await;
                        return Err(e);
                    }
                    Some(Err(join_err)) => {
                        // A panicked actor must not end the run cleanly.
                        token.cancel();
                        let _ = self.join_all(set).await;
                        return Err(SimError::Internal {
                            error: format!("actor task failed: {join_err}"),
                        });
                    }
                    Some(Ok(Ok(()))) => continue,
                    None => return Ok(()),
                }
            }
        }
    }

    /// Joins every remaining actor; actors finish their current cycle first.
    async fn join_all(&self, set: &mut JoinSet<Result<(), SimError>>) -> Result<(), SimError> {
        let mut first: Option<SimError> = None;
        while let Some(res) = set.join_next().await {
            match res {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first.get_or_insert(e);
                }
                Err(join_err) => {
                    first.get_or_insert(SimError::Internal {
                        error: format!("actor task failed: {join_err}"),
                    });
                }
            }
        }
        match first {
            None => {
                self.bus.publish_kind(EventKind::AllStopped);
                Ok(())
            }
            Some(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::FixedDelay;
    use std::time::Duration;

    /// Millisecond-scale rendition of the classic run: C=4, 10 crossers,
    /// 2 monitors, threshold at capacity.
    fn classic_cfg() -> SimConfig {
        SimConfig {
            crossers: 10,
            monitors: 2,
            capacity: 4,
            threshold: 4,
            cross_time: Duration::from_millis(2),
            max_sleep: Duration::from_millis(3),
            max_eat: Duration::from_millis(5),
            max_monitor_sleep: Duration::from_millis(3),
            run_for: Duration::from_millis(30),
            one_way: false,
            bus_capacity: 1024,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timed_run_completes_cleanly() {
        let sup = Supervisor::new(classic_cfg(), Vec::new());
        let res = tokio::time::timeout(Duration::from_secs(5), sup.run())
            .await
            .expect("run did not complete after shutdown");
        assert!(res.is_ok(), "clean run failed: {res:?}");

        // Balanced accounting: every slot returned, every leg ended,
        // legs come in forward/backward pairs.
        let corridor = &sup.corridor;
        assert_eq!(corridor.available_slots(), corridor.capacity());
        assert_eq!(corridor.occupancy(), 0);
        assert_eq!(corridor.total_crossing().unwrap(), 0);
        assert_eq!(corridor.completed_crossings() % 2, 0);
        assert!(corridor.completed_crossings() >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn forced_threshold_triggers_alarm() {
        // Threshold forced below the slot capacity: five concurrent
        // crossings are legal for the semaphore but over the limit for
        // the monitor.
        let cfg = SimConfig {
            crossers: 5,
            monitors: 1,
            capacity: 5,
            threshold: 1,
            cross_time: Duration::from_millis(20),
            max_sleep: Duration::from_millis(2),
            max_eat: Duration::from_millis(50),
            max_monitor_sleep: Duration::from_millis(2),
            run_for: Duration::from_secs(10),
            one_way: false,
            bus_capacity: 1024,
        };
        let sup = Supervisor::new(cfg, Vec::new())
            .with_delay(Arc::new(FixedDelay(Duration::from_millis(1))));

        let res = tokio::time::timeout(Duration::from_secs(1), sup.run())
            .await
            .expect("alarm did not abort the run in bounded time");
        match res {
            Err(SimError::Overload {
                total, threshold, ..
            }) => {
                assert!(total > 1, "alarm with total {total}");
                assert_eq!(threshold, 1);
            }
            other => panic!("expected overload, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_way_violation_aborts_run() {
        use crate::core::corridor::Direction;

        let cfg = SimConfig {
            crossers: 1,
            monitors: 0,
            capacity: 4,
            threshold: 100,
            cross_time: Duration::from_millis(10),
            max_sleep: Duration::from_millis(2),
            max_eat: Duration::from_millis(2),
            max_monitor_sleep: Duration::from_millis(2),
            run_for: Duration::from_secs(10),
            one_way: true,
            bus_capacity: 1024,
        };
        let sup = Supervisor::new(cfg, Vec::new())
            .with_delay(Arc::new(FixedDelay(Duration::from_millis(1))));

        // Opposing traffic planted before the run: the first forward leg
        // must detect it and abort cooperatively.
        sup.corridor.begin_crossing(Direction::Backward).unwrap();

        let res = tokio::time::timeout(Duration::from_secs(5), sup.run())
            .await
            .expect("pile-up did not abort the run in bounded time");
        assert!(matches!(res, Err(SimError::PileUp { .. })), "got {res:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn trace_is_flushed_before_run_returns() {
        use crate::events::Event;
        use async_trait::async_trait;
        use std::sync::atomic::{AtomicBool, Ordering};

        struct SawAllStopped {
            seen: AtomicBool,
        }

        #[async_trait]
        impl Subscribe for SawAllStopped {
            async fn on_event(&self, event: &Event) {
                if event.kind == EventKind::AllStopped {
                    self.seen.store(true, Ordering::SeqCst);
                }
            }

            fn name(&self) -> &'static str {
                "saw-all-stopped"
            }
        }

        let cfg = SimConfig {
            run_for: Duration::from_millis(20),
            ..classic_cfg()
        };
        let sub = Arc::new(SawAllStopped {
            seen: AtomicBool::new(false),
        });
        let sup = Supervisor::new(cfg, vec![sub.clone() as Arc<dyn Subscribe>]);

        let res = tokio::time::timeout(Duration::from_secs(5), sup.run())
            .await
            .expect("run did not complete after shutdown");
        assert!(res.is_ok(), "clean run failed: {res:?}");

        // No settling sleep: the tail of the trace must already have been
        // delivered when run() handed control back.
        assert!(
            sub.seen.load(Ordering::SeqCst),
            "AllStopped not delivered to the subscriber by the time run() returned"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn panicked_actor_surfaces_as_internal_error() {
        use crate::delay::DelaySource;

        struct PanickingDelay;

        impl DelaySource for PanickingDelay {
            fn next(&self, _max: Duration) -> Duration {
                panic!("delay source failure")
            }
        }

        let cfg = SimConfig {
            crossers: 2,
            monitors: 0,
            run_for: Duration::from_secs(10),
            ..classic_cfg()
        };
        let sup = Supervisor::new(cfg, Vec::new()).with_delay(Arc::new(PanickingDelay));

        let res = tokio::time::timeout(Duration::from_secs(1), sup.run())
            .await
            .expect("run did not terminate after an actor panic");
        match res {
            Err(SimError::Internal { error }) => {
                assert!(error.contains("panic"), "unexpected diagnostic: {error}");
            }
            other => panic!("expected an internal error, got {other:?}"),
        }
    }
}
