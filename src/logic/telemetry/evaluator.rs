//! Threshold Evaluator
//!
//! Only the rule evaluation, no types and no alert copy.
//! Input: one Reading. Output: the alerts the fixed rules produce for it.

use super::rules::{
    yield_alert_message, BIOCHAR_NOTICE_KG, CAPACITY_ALERT_MESSAGE, COOLING_ALERT_MESSAGE,
    TEMPERATURE_WARN_C, WASTE_INPUT_WARN_KG,
};
use super::types::{Alert, Reading};

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluate one reading against the fixed rule set
///
/// Deterministic and order-stable: rules run in priority order, each one
/// fires independently, so a single reading yields 0-3 alerts. All
/// comparisons are strictly greater than the threshold.
pub fn evaluate(reading: &Reading) -> Vec<Alert> {
    let mut alerts = Vec::new();

    // Rule 1: reactor running hot
    if reading.temperature_c > TEMPERATURE_WARN_C {
        alerts.push(Alert::warning(COOLING_ALERT_MESSAGE));
    }

    // Rule 2: bin close to capacity
    if reading.waste_input_kg > WASTE_INPUT_WARN_KG {
        alerts.push(Alert::warning(CAPACITY_ALERT_MESSAGE));
    }

    // Rule 3: strong yield this batch
    if reading.biochar_output_kg > BIOCHAR_NOTICE_KG {
        alerts.push(Alert::success(&yield_alert_message(
            reading.biochar_output_kg,
        )));
    }

    alerts
}

// ============================================================================
// TESTS
// ============================================================================
