//! Bin Alert Rules & Thresholds
//!
//! All threshold values and alert copy for the reactor bin pipeline.
//! No evaluation logic here, only constants and message builders.

// ============================================================================
// THRESHOLDS (strictly-greater comparisons)
// ============================================================================

/// Above this reactor temperature = cooling warning
pub const TEMPERATURE_WARN_C: f64 = 550.0;

/// Above this waste input = capacity warning
pub const WASTE_INPUT_WARN_KG: f64 = 12.0;

/// Above this biochar yield = production success notice
pub const BIOCHAR_NOTICE_KG: f64 = 2.0;

// ============================================================================
// ALERT COPY
// ============================================================================

/// Rule 1 message (reactor temperature)
pub const COOLING_ALERT_MESSAGE: &str =
    "Temperature exceeding optimal range. Adjusting cooling system.";

/// Rule 2 message (waste capacity)
pub const CAPACITY_ALERT_MESSAGE: &str =
    "Approaching maximum waste capacity. Consider processing current batch.";

/// Rule 3 message (biochar yield), interpolates the sampled value
pub fn yield_alert_message(biochar_output_kg: f64) -> String {
    format!(
        "Biochar production optimal. {}kg produced in this batch.",
        biochar_output_kg
    )
}

// ============================================================================
// TESTS
// ============================================================================
