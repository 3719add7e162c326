//! Bin Monitor Engine
//!
//! Owns the periodic tick schedule for one reactor bin: sample a reading,
//! evaluate the rules, retain the alerts, notify listeners. Explicitly
//! constructed per bin; callers hold the instance, there is no global.
//!
//! Lifecycle: Idle -> Running -> Stopped, restartable. Each run gets its
//! own handle; stopping only prevents future ticks, a tick already in
//! flight still completes and notifies.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::constants::DEFAULT_ALERT_LOG_CAPACITY;

use super::alert_log::AlertLog;
use super::evaluator::evaluate;
use super::sampler::{ReadingSource, UniformSampler};
use super::types::{Alert, Reading};

// ============================================================================
// STATE
// ============================================================================

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonitorState {
    /// Constructed, never started
    Idle,
    /// Tick schedule active
    Running,
    /// Schedule stopped, restartable
    Stopped,
}

impl MonitorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorState::Idle => "idle",
            MonitorState::Running => "running",
            MonitorState::Stopped => "stopped",
        }
    }
}

/// Handle identifying one run of one monitor instance
///
/// Returned by `start()`; required by `stop()`. A restarted monitor hands
/// out a fresh handle, so handles from earlier runs go stale and are
/// ignored by `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorHandle {
    instance: u64,
    epoch: u64,
}

/// Point-in-time status summary
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStatus {
    pub state: MonitorState,
    pub ticks: u64,
    pub retained_alerts: usize,
    pub latest_reading: Option<Reading>,
}

struct Lifecycle {
    state: MonitorState,
    epoch: u64,
}

type ListenerFn = dyn Fn(&Reading, &[Alert]) + Send + Sync;

struct MonitorInner {
    instance_id: u64,
    source: Box<dyn ReadingSource>,
    lifecycle: Mutex<Lifecycle>,
    latest: RwLock<Option<Reading>>,
    alerts: Mutex<AlertLog>,
    listeners: RwLock<Vec<(u64, Arc<ListenerFn>)>>,
    next_listener_id: AtomicU64,
    ticks: AtomicU64,
}

impl MonitorInner {
    /// Run one full pipeline pass: sample, evaluate, retain, notify
    fn run_tick(&self) -> Reading {
        let reading = self.source.sample();
        let alerts = evaluate(&reading);

        if !alerts.is_empty() {
            self.alerts.lock().push_batch(alerts.clone());
        }
        *self.latest.write() = Some(reading);
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;

        log::debug!(
            "[MONITOR] tick {}: temp {:.1}C, waste {:.1}kg, {} new alert(s)",
            tick,
            reading.temperature_c,
            reading.waste_input_kg,
            alerts.len()
        );

        self.notify(&reading);
        reading
    }

    /// Invoke every listener, in registration order, with the new reading
    /// and a snapshot of the alert log. Runs over a copy of the registry so
    /// listeners may subscribe or unsubscribe without deadlocking.
    fn notify(&self, reading: &Reading) {
        let snapshot = self.alerts.lock().snapshot();
        let listeners: Vec<Arc<ListenerFn>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(reading, &snapshot);
        }
    }

    fn should_tick(&self, epoch: u64) -> bool {
        let lifecycle = self.lifecycle.lock();
        lifecycle.state == MonitorState::Running && lifecycle.epoch == epoch
    }
}

// ============================================================================
// TICK LOOP
// ============================================================================

async fn monitor_loop(inner: Arc<MonitorInner>, epoch: u64, interval: Duration) {
    log::info!(
        "[MONITOR] tick loop started (interval: {}ms)",
        interval.as_millis()
    );

    loop {
        tokio::time::sleep(interval).await;
        if !inner.should_tick(epoch) {
            break;
        }
        inner.run_tick();
    }

    log::info!("[MONITOR] tick loop stopped");
}

// ============================================================================
// BIN MONITOR
// ============================================================================

/// Timer-driven telemetry pipeline for one reactor bin
pub struct BinMonitor {
    inner: Arc<MonitorInner>,
}

impl BinMonitor {
    /// Monitor backed by the production uniform sampler
    pub fn new() -> Self {
        Self::with_source(Box::new(UniformSampler), DEFAULT_ALERT_LOG_CAPACITY)
    }

    /// Monitor with a custom reading source and alert capacity
    pub fn with_source(source: Box<dyn ReadingSource>, alert_capacity: usize) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst),
                source,
                lifecycle: Mutex::new(Lifecycle {
                    state: MonitorState::Idle,
                    epoch: 0,
                }),
                latest: RwLock::new(None),
                alerts: Mutex::new(AlertLog::new(alert_capacity)),
                listeners: RwLock::new(Vec::new()),
                next_listener_id: AtomicU64::new(1),
                ticks: AtomicU64::new(0),
            }),
        }
    }

    /// Start the periodic schedule, or return the active handle if already
    /// running (the requested interval is ignored in that case)
    ///
    /// Must be called from inside the tokio runtime.
    pub fn start(&self, interval: Duration) -> MonitorHandle {
        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.state == MonitorState::Running {
            log::debug!("[MONITOR] start ignored: already running");
            return MonitorHandle {
                instance: self.inner.instance_id,
                epoch: lifecycle.epoch,
            };
        }

        lifecycle.epoch += 1;
        lifecycle.state = MonitorState::Running;
        let handle = MonitorHandle {
            instance: self.inner.instance_id,
            epoch: lifecycle.epoch,
        };
        drop(lifecycle);

        let inner = Arc::clone(&self.inner);
        let epoch = handle.epoch;
        tokio::spawn(async move {
            monitor_loop(inner, epoch, interval).await;
        });

        log::info!(
            "[MONITOR] started (interval: {}ms, log capacity: {})",
            interval.as_millis(),
            self.inner.alerts.lock().capacity()
        );
        handle
    }

    /// Stop the schedule identified by `handle`
    ///
    /// Idempotent: stopping a monitor that is not running is a no-op, and a
    /// stale handle from an earlier run is ignored. A handle from a
    /// different monitor instance is a caller bug.
    pub fn stop(&self, handle: &MonitorHandle) {
        if handle.instance != self.inner.instance_id {
            debug_assert!(
                false,
                "stop called with a handle from another monitor instance"
            );
            log::warn!("[MONITOR] stop ignored: handle belongs to another monitor instance");
            return;
        }

        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.state != MonitorState::Running {
            return;
        }
        if handle.epoch != lifecycle.epoch {
            log::debug!("[MONITOR] stop ignored: stale handle");
            return;
        }

        lifecycle.state = MonitorState::Stopped;
        log::info!("[MONITOR] stopped");
    }

    /// Register a listener called synchronously after every pipeline update
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Reading, &[Alert]) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.write().push((id, Arc::new(listener)));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Draw one reading without feeding the pipeline
    pub fn sample_once(&self) -> Reading {
        self.inner.source.sample()
    }

    /// Run one full pipeline pass immediately, outside the schedule
    ///
    /// Indistinguishable from a periodic tick for listeners: same sample,
    /// evaluate, retain, notify sequence. Does not reset the alert log and
    /// does not disturb the running schedule.
    pub fn refresh(&self) -> Reading {
        self.inner.run_tick()
    }

    pub fn state(&self) -> MonitorState {
        self.inner.lifecycle.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    /// Latest reading seen by the pipeline, if any tick has run
    pub fn latest_reading(&self) -> Option<Reading> {
        *self.inner.latest.read()
    }

    /// Snapshot of retained alerts, newest first
    pub fn alerts(&self) -> Vec<Alert> {
        self.inner.alerts.lock().snapshot()
    }

    /// Drop all retained alerts; never happens implicitly
    pub fn clear_alerts(&self) {
        self.inner.alerts.lock().clear();
        log::info!("[MONITOR] alert log cleared");
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            state: self.state(),
            ticks: self.inner.ticks.load(Ordering::SeqCst),
            retained_alerts: self.inner.alerts.lock().len(),
            latest_reading: self.latest_reading(),
        }
    }
}

impl Default for BinMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BinMonitor {
    fn drop(&mut self) {
        // The tick task holds its own Arc; flip the state so it exits on
        // the next wake instead of running forever.
        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.state == MonitorState::Running {
            lifecycle.state = MonitorState::Stopped;
        }
    }
}

// ============================================================================
// SUBSCRIPTION
// ============================================================================

/// Registration receipt for one listener
pub struct Subscription {
    inner: Weak<MonitorInner>,
    id: u64,
}

impl Subscription {
    /// Remove the listener. Calling this twice is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.write().retain(|(id, _)| *id != self.id);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::rules::{COOLING_ALERT_MESSAGE, TEMPERATURE_WARN_C};
    use crate::logic::telemetry::sampler::FixedSource;
    use crate::logic::telemetry::types::Severity;
    use std::sync::atomic::AtomicUsize;

    const TICK: Duration = Duration::from_millis(5000);

    fn hot_monitor() -> BinMonitor {
        // temp > 550 and biochar > 2, so every tick yields two alerts
        BinMonitor::with_source(Box::new(FixedSource(Reading::new(560.0, 5.0, 3.0, 2.0))), 50)
    }

    fn quiet_monitor() -> BinMonitor {
        BinMonitor::with_source(Box::new(FixedSource(Reading::new(500.0, 10.0, 1.5, 4.0))), 50)
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_runs_full_pipeline() {
        let monitor = hot_monitor();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = monitor.subscribe(move |reading, alerts| {
            sink.lock().push((*reading, alerts.to_vec()));
        });

        let handle = monitor.start(TICK);
        tokio::time::sleep(Duration::from_millis(5100)).await;

        let calls = seen.lock();
        assert_eq!(calls.len(), 1);
        let (reading, alerts) = &calls[0];
        assert!(reading.temperature_c > TEMPERATURE_WARN_C);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].message, COOLING_ALERT_MESSAGE);
        assert_eq!(alerts[1].severity, Severity::Success);
        assert_eq!(
            alerts[1].message,
            "Biochar production optimal. 3kg produced in this batch."
        );
        drop(calls);

        monitor.stop(&handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentrant_start_returns_active_handle() {
        let monitor = quiet_monitor();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _sub = monitor.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = monitor.start(TICK);
        let second = monitor.start(Duration::from_millis(1000));
        assert_eq!(first, second);

        // Only one schedule may exist: 2 ticks after 2 intervals, not 10
        tokio::time::sleep(Duration::from_millis(10_100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        monitor.stop(&first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_future_ticks() {
        let monitor = quiet_monitor();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _sub = monitor.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handle = monitor.start(TICK);
        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        monitor.stop(&handle);
        assert_eq!(monitor.state(), MonitorState::Stopped);

        // Idempotent, and no amount of elapsed time produces another tick
        monitor.stop(&handle);
        tokio::time::sleep(Duration::from_millis(60_000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_gets_fresh_handle_and_keeps_log() {
        let monitor = hot_monitor();
        let first = monitor.start(TICK);
        tokio::time::sleep(Duration::from_millis(5100)).await;
        monitor.stop(&first);

        let retained = monitor.alerts().len();
        assert_eq!(retained, 2);

        let second = monitor.start(TICK);
        assert_ne!(first, second);
        assert!(monitor.is_running());

        // Stale handle from the first run must not stop the second
        monitor.stop(&first);
        assert!(monitor.is_running());

        // Log survived the restart until cleared explicitly
        assert_eq!(monitor.alerts().len(), retained);
        monitor.clear_alerts();
        assert!(monitor.alerts().is_empty());

        monitor.stop(&second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_twice_is_noop() {
        let monitor = quiet_monitor();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let sub = monitor.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handle = monitor.start(TICK);
        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        sub.unsubscribe();
        sub.unsubscribe();

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        monitor.stop(&handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listeners_run_in_registration_order() {
        let monitor = quiet_monitor();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = monitor.subscribe(move |_, _| first.lock().push("first"));
        let second = Arc::clone(&order);
        let _b = monitor.subscribe(move |_, _| second.lock().push("second"));

        monitor.refresh();
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_refresh_feeds_pipeline_without_schedule() {
        let monitor = hot_monitor();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _sub = monitor.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(monitor.state(), MonitorState::Idle);
        let reading = monitor.refresh();

        assert_eq!(reading.temperature_c, 560.0);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.alerts().len(), 2);
        assert_eq!(monitor.latest_reading().map(|r| r.temperature_c), Some(560.0));
        assert_eq!(monitor.status().ticks, 1);
    }

    #[tokio::test]
    async fn test_sample_once_leaves_pipeline_untouched() {
        let monitor = hot_monitor();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _sub = monitor.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let reading = monitor.sample_once();
        assert_eq!(reading.temperature_c, 560.0);

        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert!(monitor.alerts().is_empty());
        assert!(monitor.latest_reading().is_none());
    }

    #[tokio::test]
    #[should_panic(expected = "another monitor instance")]
    async fn test_stop_with_foreign_handle_panics_in_debug() {
        let a = quiet_monitor();
        let b = quiet_monitor();
        let handle_b = b.start(TICK);
        a.stop(&handle_b);
    }
}
