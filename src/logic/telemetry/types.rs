//! Bin Telemetry Types
//!
//! Immutable, timestamped readings and alerts for the reactor bin pipeline.
//! These records are the core data structures for monitoring & display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity of a bin alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational notice
    Info,
    /// Operating condition needs attention
    Warning,
    /// Positive operational outcome
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "[INFO]",
            Severity::Warning => "[WARN]",
            Severity::Success => "[OK]",
        }
    }
}

// ============================================================================
// READING
// ============================================================================

/// One sampled snapshot of the reactor bin
///
/// Readings are memoryless: each one is drawn independently, with no
/// dependence on the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Reactor temperature (degrees Celsius)
    pub temperature_c: f64,
    /// Waste fed into the bin this cycle (kg)
    pub waste_input_kg: f64,
    /// Biochar produced this cycle (kg)
    pub biochar_output_kg: f64,
    /// CO2 offset credited this cycle (kg)
    pub co2_offset_kg: f64,
    /// When the reading was captured (UTC)
    pub captured_at: DateTime<Utc>,
}

impl Reading {
    /// Create a reading captured now
    pub fn new(temperature_c: f64, waste_input_kg: f64, biochar_output_kg: f64, co2_offset_kg: f64) -> Self {
        Self {
            temperature_c,
            waste_input_kg,
            biochar_output_kg,
            co2_offset_kg,
            captured_at: Utc::now(),
        }
    }
}

// ============================================================================
// ALERT
// ============================================================================

static NEXT_ALERT_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable alert record
///
/// Each alert represents one rule firing (or one feed insight) at a point
/// in time. Alerts are append-only and never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert ID (monotonic across the process)
    pub id: u64,
    /// Human-readable alert text
    pub message: String,
    /// Alert severity
    pub severity: Severity,
    /// When the alert was created (UTC)
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Create a new alert with a fresh ID and the current timestamp
    pub fn new(severity: Severity, message: &str) -> Self {
        Self {
            id: NEXT_ALERT_ID.fetch_add(1, Ordering::SeqCst),
            message: message.to_string(),
            severity,
            created_at: Utc::now(),
        }
    }

    // Convenience constructors
    pub fn info(message: &str) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn success(message: &str) -> Self {
        Self::new(Severity::Success, message)
    }
}

// ============================================================================
// TESTS
// ============================================================================
