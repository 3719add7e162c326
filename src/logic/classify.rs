//! Waste Classification Simulator
//!
//! Stands in for the vision model: given a sample photo name it waits a
//! realistic processing delay, then draws a plausible classification.
//! Deliberately random, no inference happens here.

use std::ops::Range;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::constants::get_classify_latency_ms;

// ============================================================================
// FIXTURES
// ============================================================================

/// Categories the simulated model can report
pub const WASTE_CATEGORIES: [&str; 3] = ["Recyclable", "Compostable", "Mixed Waste"];

/// Materials the simulated model can detect
pub const DETECTABLE_MATERIALS: [&str; 5] = [
    "PET Plastic",
    "Cardboard",
    "Organic Matter",
    "Metal",
    "Glass",
];

/// Handling advice attached to every result
pub const HANDLING_RECOMMENDATIONS: [&str; 3] = [
    "Separate materials by type",
    "Remove any contamination",
    "Process within optimal temperature range",
];

/// Reported confidence range
const CONFIDENCE_RANGE: Range<f64> = 0.85..0.95;

/// Distinct materials reported per sample
const MATERIALS_PER_SAMPLE: usize = 3;

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// One simulated classification result
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Unique result ID
    pub id: String,
    /// Name of the analyzed sample
    pub sample_name: String,
    /// Reported category
    pub category: &'static str,
    /// Reported confidence, 0.85 to 0.95
    pub confidence: f64,
    /// Distinct detected materials
    pub materials: Vec<&'static str>,
    /// Fixed handling advice
    pub recommendations: Vec<&'static str>,
    /// When the analysis finished (UTC)
    pub analyzed_at: DateTime<Utc>,
}

/// Draw a classification immediately, without the processing delay
pub fn classify_now(sample_name: &str) -> Classification {
    let mut rng = rand::thread_rng();

    let category = WASTE_CATEGORIES
        .choose(&mut rng)
        .copied()
        .unwrap_or(WASTE_CATEGORIES[0]);
    let materials: Vec<&'static str> = DETECTABLE_MATERIALS
        .choose_multiple(&mut rng, MATERIALS_PER_SAMPLE)
        .copied()
        .collect();

    Classification {
        id: Uuid::new_v4().to_string(),
        sample_name: sample_name.to_string(),
        category,
        confidence: rng.gen_range(CONFIDENCE_RANGE),
        materials,
        recommendations: HANDLING_RECOMMENDATIONS.to_vec(),
        analyzed_at: Utc::now(),
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Simulated classifier with a configurable processing delay
pub struct WasteClassifier {
    latency: Duration,
}

impl WasteClassifier {
    /// Classifier with the configured latency (env or default)
    pub fn new() -> Self {
        Self::with_latency(Duration::from_millis(get_classify_latency_ms()))
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// Analyze a sample: wait the processing delay, then draw a result
    pub async fn classify(&self, sample_name: &str) -> Classification {
        tokio::time::sleep(self.latency).await;
        let result = classify_now(sample_name);
        log::info!(
            "[CLASSIFY] {} -> {} ({:.0}% confidence, {} materials)",
            result.sample_name,
            result.category,
            result.confidence * 100.0,
            result.materials.len()
        );
        result
    }
}

impl Default for WasteClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
