//! Reading Generation
//!
//! Produces the simulated sensor readings that feed the pipeline. The
//! `ReadingSource` trait is the seam for swapping the simulator out for
//! real sensor ingestion later; everything downstream only sees the trait.

use std::ops::RangeInclusive;

use rand::Rng;

use super::types::Reading;

// ============================================================================
// SAMPLING RANGES
// ============================================================================

/// Reactor temperature range (degrees Celsius)
pub const TEMPERATURE_RANGE_C: RangeInclusive<f64> = 400.0..=600.0;

/// Waste input range (kg)
pub const WASTE_INPUT_RANGE_KG: RangeInclusive<f64> = 5.0..=15.0;

/// Biochar output range (kg)
pub const BIOCHAR_OUTPUT_RANGE_KG: RangeInclusive<f64> = 1.0..=4.0;

/// CO2 offset range (kg)
pub const CO2_OFFSET_RANGE_KG: RangeInclusive<f64> = 2.0..=6.0;

// ============================================================================
// READING SOURCE
// ============================================================================

/// Anything that can produce a bin reading on demand
pub trait ReadingSource: Send + Sync {
    fn sample(&self) -> Reading;
}

/// Production source: independent uniform draws from the documented ranges
///
/// Memoryless on purpose. Each call draws fresh values with no smoothing
/// and no dependence on earlier samples.
#[derive(Debug, Default)]
pub struct UniformSampler;

impl ReadingSource for UniformSampler {
    fn sample(&self) -> Reading {
        let mut rng = rand::thread_rng();
        Reading::new(
            rng.gen_range(TEMPERATURE_RANGE_C),
            rng.gen_range(WASTE_INPUT_RANGE_KG),
            rng.gen_range(BIOCHAR_OUTPUT_RANGE_KG),
            rng.gen_range(CO2_OFFSET_RANGE_KG),
        )
    }
}

/// Test source that always reports the same field values
#[cfg(test)]
pub struct FixedSource(pub Reading);

#[cfg(test)]
impl ReadingSource for FixedSource {
    fn sample(&self) -> Reading {
        Reading {
            captured_at: chrono::Utc::now(),
            ..self.0
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
