//! Analytics Feed Engine
//!
//! Periodic engine behind the AI-updates panel: a short waste-volume
//! forecast walk, freshly sampled waste composition, and an occasional
//! operator insight. Runs on its own cadence, independent of the bin
//! monitor, and publishes through the same listener pattern.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use serde::Serialize;

use crate::constants::DEFAULT_INSIGHT_FEED_CAPACITY;

use super::telemetry::{Alert, AlertLog};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Points retained in the forecast window
const FORECAST_WINDOW: usize = 10;

/// Walk origin before the first point lands (kg)
const FORECAST_SEED_PREDICTED_KG: f64 = 300.0;
const FORECAST_SEED_ACTUAL_KG: f64 = 290.0;

/// Per-tick walk step bounds (kg)
const PREDICTED_STEP_KG: f64 = 10.0;
const ACTUAL_STEP_KG: f64 = 7.5;

/// Chance that a tick emits an insight
const INSIGHT_CHANCE: f64 = 0.3;

/// Fixed insight copy, picked uniformly when a tick emits one
pub const INSIGHT_MESSAGES: [&str; 4] = [
    "High recyclable content detected",
    "Optimal processing conditions",
    "Consider batch processing",
    "Efficiency improvement opportunity",
];

/// Composition share ranges (percent)
const RECYCLABLE_RANGE_PCT: Range<f64> = 35.0..55.0;
const COMPOSTABLE_RANGE_PCT: Range<f64> = 25.0..45.0;
const LANDFILL_RANGE_PCT: Range<f64> = 15.0..25.0;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One point of the waste-volume forecast walk
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ForecastPoint {
    pub recorded_at: DateTime<Utc>,
    pub predicted_kg: f64,
    pub actual_kg: f64,
}

/// One waste-composition share
///
/// Shares are independent draws and intentionally not normalized to 100.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompositionSlice {
    pub name: &'static str,
    pub share_pct: f64,
}

/// Everything the AI-updates panel shows, captured at one moment
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
    /// Forecast window, oldest first
    pub forecast: Vec<ForecastPoint>,
    /// Latest composition sample (empty until the first tick)
    pub composition: Vec<CompositionSlice>,
    /// Insight feed, newest first
    pub insights: Vec<Alert>,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// COMPOSITION SAMPLING
// ============================================================================

/// Draw a fresh composition sample
pub fn sample_composition<R: Rng>(rng: &mut R) -> Vec<CompositionSlice> {
    vec![
        CompositionSlice {
            name: "Recyclable",
            share_pct: rng.gen_range(RECYCLABLE_RANGE_PCT),
        },
        CompositionSlice {
            name: "Compostable",
            share_pct: rng.gen_range(COMPOSTABLE_RANGE_PCT),
        },
        CompositionSlice {
            name: "Landfill",
            share_pct: rng.gen_range(LANDFILL_RANGE_PCT),
        },
    ]
}

// ============================================================================
// ENGINE STATE
// ============================================================================

type AnalyticsListenerFn = dyn Fn(&AnalyticsSnapshot) + Send + Sync;

struct AnalyticsInner {
    running: AtomicBool,
    epoch: AtomicU64,
    forecast: Mutex<Vec<ForecastPoint>>,
    composition: Mutex<Vec<CompositionSlice>>,
    insights: Mutex<AlertLog>,
    listeners: RwLock<Vec<(u64, Arc<AnalyticsListenerFn>)>>,
    next_listener_id: AtomicU64,
    ticks: AtomicU64,
}

impl AnalyticsInner {
    fn run_tick(&self) {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        // Advance the forecast walk from the last point (or the seed)
        {
            let mut forecast = self.forecast.lock();
            let (last_predicted, last_actual) = forecast
                .last()
                .map(|p| (p.predicted_kg, p.actual_kg))
                .unwrap_or((FORECAST_SEED_PREDICTED_KG, FORECAST_SEED_ACTUAL_KG));

            forecast.push(ForecastPoint {
                recorded_at: now,
                predicted_kg: last_predicted + rng.gen_range(-PREDICTED_STEP_KG..PREDICTED_STEP_KG),
                actual_kg: last_actual + rng.gen_range(-ACTUAL_STEP_KG..ACTUAL_STEP_KG),
            });

            if forecast.len() > FORECAST_WINDOW {
                let excess = forecast.len() - FORECAST_WINDOW;
                forecast.drain(0..excess);
            }
        }

        // Fresh composition every tick
        *self.composition.lock() = sample_composition(&mut rng);

        // Occasional insight into the bounded feed
        if rng.gen_bool(INSIGHT_CHANCE) {
            let message = INSIGHT_MESSAGES[rng.gen_range(0..INSIGHT_MESSAGES.len())];
            let alert = Alert::info(message);
            log::debug!(
                "[ANALYTICS] insight ({}): {}",
                alert.severity.as_str(),
                alert.message
            );
            self.insights.lock().push(alert);
        }

        self.ticks.fetch_add(1, Ordering::SeqCst);
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Arc<AnalyticsListenerFn>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            forecast: self.forecast.lock().clone(),
            composition: self.composition.lock().clone(),
            insights: self.insights.lock().snapshot(),
            generated_at: Utc::now(),
        }
    }
}

// ============================================================================
// FEED LOOP
// ============================================================================

async fn analytics_loop(inner: Arc<AnalyticsInner>, epoch: u64, interval: Duration) {
    log::info!(
        "[ANALYTICS] feed loop started (interval: {}ms)",
        interval.as_millis()
    );

    loop {
        tokio::time::sleep(interval).await;
        let live = inner.running.load(Ordering::SeqCst)
            && inner.epoch.load(Ordering::SeqCst) == epoch;
        if !live {
            break;
        }
        inner.run_tick();
    }

    log::info!("[ANALYTICS] feed loop stopped");
}

// ============================================================================
// ANALYTICS ENGINE
// ============================================================================

/// Periodic analytics feed for the AI-updates panel
pub struct AnalyticsEngine {
    inner: Arc<AnalyticsInner>,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AnalyticsInner {
                running: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                forecast: Mutex::new(Vec::new()),
                composition: Mutex::new(Vec::new()),
                insights: Mutex::new(AlertLog::new(DEFAULT_INSIGHT_FEED_CAPACITY)),
                listeners: RwLock::new(Vec::new()),
                next_listener_id: AtomicU64::new(1),
                ticks: AtomicU64::new(0),
            }),
        }
    }

    /// Start the feed; returns false if it was already running
    ///
    /// Must be called from inside the tokio runtime.
    pub fn start(&self, interval: Duration) -> bool {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            log::debug!("[ANALYTICS] start ignored: already running");
            return false;
        }

        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            analytics_loop(inner, epoch, interval).await;
        });

        log::info!("[ANALYTICS] started (interval: {}ms)", interval.as_millis());
        true
    }

    /// Stop the feed; future ticks only, an in-flight tick completes
    pub fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        log::info!("[ANALYTICS] stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Register a listener called synchronously after every feed tick
    pub fn subscribe<F>(&self, listener: F) -> AnalyticsSubscription
    where
        F: Fn(&AnalyticsSnapshot) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.write().push((id, Arc::new(listener)));
        AnalyticsSubscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        self.inner.snapshot()
    }

    pub fn ticks(&self) -> u64 {
        self.inner.ticks.load(Ordering::SeqCst)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnalyticsEngine {
    fn drop(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
    }
}

/// Registration receipt for one feed listener
pub struct AnalyticsSubscription {
    inner: Weak<AnalyticsInner>,
    id: u64,
}

impl AnalyticsSubscription {
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
    use crate::logic::telemetry::Severity;

    const TICK: Duration = Duration::from_millis(3000);

    async fn run_ticks(engine: &AnalyticsEngine, count: u64) {
        let interval_ms = 3000 * count + 100;
        tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        assert_eq!(engine.ticks(), count);
    }

    #[test]
    fn test_sample_composition_ranges() {
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let slices = sample_composition(&mut rng);
            assert_eq!(slices.len(), 3);
            assert_eq!(slices[0].name, "Recyclable");
            assert!(RECYCLABLE_RANGE_PCT.contains(&slices[0].share_pct));
            assert_eq!(slices[1].name, "Compostable");
            assert!(COMPOSTABLE_RANGE_PCT.contains(&slices[1].share_pct));
            assert_eq!(slices[2].name, "Landfill");
            assert!(LANDFILL_RANGE_PCT.contains(&slices[2].share_pct));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_forecast_window_and_step_bounds() {
        let engine = AnalyticsEngine::new();
        engine.start(TICK);
        run_ticks(&engine, 14).await;
        engine.stop();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.forecast.len(), FORECAST_WINDOW);

        for pair in snapshot.forecast.windows(2) {
            let predicted_step = (pair[1].predicted_kg - pair[0].predicted_kg).abs();
            let actual_step = (pair[1].actual_kg - pair[0].actual_kg).abs();
            assert!(predicted_step <= PREDICTED_STEP_KG);
            assert!(actual_step <= ACTUAL_STEP_KG);
            assert!(pair[0].recorded_at <= pair[1].recorded_at);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_point_steps_from_seed() {
        let engine = AnalyticsEngine::new();
        engine.start(TICK);
        run_ticks(&engine, 1).await;
        engine.stop();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.forecast.len(), 1);
        let first = snapshot.forecast[0];
        assert!((first.predicted_kg - FORECAST_SEED_PREDICTED_KG).abs() <= PREDICTED_STEP_KG);
        assert!((first.actual_kg - FORECAST_SEED_ACTUAL_KG).abs() <= ACTUAL_STEP_KG);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insight_feed_stays_capped() {
        let engine = AnalyticsEngine::new();
        engine.start(TICK);
        // 200 ticks emit ~60 insights; the odds of fewer than 6 are nil
        run_ticks(&engine, 200).await;
        engine.stop();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.insights.len(), DEFAULT_INSIGHT_FEED_CAPACITY);
        for insight in &snapshot.insights {
            assert_eq!(insight.severity, Severity::Info);
            assert!(INSIGHT_MESSAGES.contains(&insight.message.as_str()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_composition_resampled_each_tick() {
        let engine = AnalyticsEngine::new();
        assert!(engine.snapshot().composition.is_empty());

        engine.start(TICK);
        tokio::time::sleep(Duration::from_millis(3100)).await;
        let first = engine.snapshot().composition;
        tokio::time::sleep(Duration::from_millis(3000)).await;
        let second = engine.snapshot().composition;
        engine.stop();

        assert_eq!(engine.ticks(), 2);
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert_ne!(first[0].share_pct, second[0].share_pct);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_future_ticks() {
        let engine = AnalyticsEngine::new();
        let seen = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&seen);
        let _sub = engine.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(engine.start(TICK));
        assert!(!engine.start(TICK));
        assert!(engine.is_running());

        run_ticks(&engine, 2).await;
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());

        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert_eq!(engine.ticks(), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_sees_snapshot_and_unsubscribes() {
        let engine = AnalyticsEngine::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = engine.subscribe(move |snapshot: &AnalyticsSnapshot| {
            sink.lock().push(snapshot.forecast.len());
        });

        engine.start(TICK);
        run_ticks(&engine, 2).await;

        sub.unsubscribe();
        sub.unsubscribe();
        tokio::time::sleep(Duration::from_millis(6000)).await;
        engine.stop();

        assert_eq!(*seen.lock(), vec![1, 2]);
    }
}
