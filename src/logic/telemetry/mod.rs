//! Telemetry Module
//!
//! The reactor bin pipeline: reading generation, threshold evaluation,
//! bounded alert retention, change notification. This is the backbone of
//! the dashboard - every panel that shows bin state observes it through
//! the subscription interface; the pipeline itself renders nothing.
//!
//! ## Structure
//! - `types.rs` - Reading and Alert records (immutable, timestamped)
//! - `sampler.rs` - ReadingSource seam + uniform simulator
//! - `rules.rs` - thresholds and alert copy
//! - `evaluator.rs` - fixed rule evaluation
//! - `alert_log.rs` - newest-first bounded retention
//! - `monitor.rs` - lifecycle, tick schedule, subscriptions

pub mod alert_log;
pub mod evaluator;
pub mod monitor;
pub mod rules;
pub mod sampler;
pub mod types;

// Re-export main types
pub use alert_log::AlertLog;
pub use monitor::{BinMonitor, MonitorHandle, MonitorState, MonitorStatus, Subscription};
pub use sampler::{ReadingSource, UniformSampler};
pub use types::{Alert, Reading, Severity};
