//! Environment Sampling
//!
//! Synthetic site conditions for the Eco-Sense panel and the projected
//! impact trajectory for the Eco-Impact panel. Both are stateless
//! generators; a refresh regenerates the whole series.

use std::ops::Range;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Hourly points in one environment series
const ENV_SERIES_POINTS: usize = 24;

const ENV_TEMPERATURE_RANGE_C: Range<f64> = 20.0..30.0;
const ENV_HUMIDITY_RANGE_PCT: Range<f64> = 40.0..70.0;
const ENV_AIR_QUALITY_RANGE: Range<f64> = 30.0..80.0;
const ENV_CO2_RANGE_PPM: Range<f64> = 350.0..450.0;

/// Monthly points in one impact trajectory
const IMPACT_MONTHS: usize = 6;

/// Baseline decay per month, by metric (percentage points)
const CARBON_DECAY_PER_MONTH: f64 = 10.0;
const WATER_DECAY_PER_MONTH: f64 = 8.0;
const ENERGY_DECAY_PER_MONTH: f64 = 12.0;

/// Uniform noise added to each decay step
const DECAY_NOISE: f64 = 5.0;

/// Distribution split shown when no projection model output is available
pub const DEFAULT_IMPACT_SPLIT: [(&str, f64); 3] = [
    ("Carbon Reduction", 40.0),
    ("Water Savings", 35.0),
    ("Energy Efficiency", 25.0),
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One hourly site-condition sample
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnvSample {
    pub taken_at: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub air_quality_index: f64,
    pub co2_ppm: f64,
}

/// One month of the projected impact trajectory
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImpactPoint {
    /// Months from now (0 = current month)
    pub month_offset: u32,
    pub carbon_pct: f64,
    pub water_pct: f64,
    pub energy_pct: f64,
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Generate 24 hourly samples ending at the current hour
pub fn sample_day() -> Vec<EnvSample> {
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    (0..ENV_SERIES_POINTS)
        .map(|i| {
            let hours_back = (ENV_SERIES_POINTS - 1 - i) as i64;
            EnvSample {
                taken_at: now - chrono::Duration::hours(hours_back),
                temperature_c: rng.gen_range(ENV_TEMPERATURE_RANGE_C),
                humidity_pct: rng.gen_range(ENV_HUMIDITY_RANGE_PCT),
                air_quality_index: rng.gen_range(ENV_AIR_QUALITY_RANGE),
                co2_ppm: rng.gen_range(ENV_CO2_RANGE_PPM),
            }
        })
        .collect()
}

/// Project the impact metrics over the next months
///
/// Each metric decays from 100 percent at its own rate with a little
/// noise, floored at zero.
pub fn impact_trajectory() -> Vec<ImpactPoint> {
    let mut rng = rand::thread_rng();

    (0..IMPACT_MONTHS)
        .map(|i| {
            let month = i as f64;
            ImpactPoint {
                month_offset: i as u32,
                carbon_pct: (100.0
                    - (month * CARBON_DECAY_PER_MONTH + rng.gen_range(0.0..DECAY_NOISE)))
                .max(0.0),
                water_pct: (100.0
                    - (month * WATER_DECAY_PER_MONTH + rng.gen_range(0.0..DECAY_NOISE)))
                .max(0.0),
                energy_pct: (100.0
                    - (month * ENERGY_DECAY_PER_MONTH + rng.gen_range(0.0..DECAY_NOISE)))
                .max(0.0),
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_series_shape_and_ranges() {
        let series = sample_day();
        assert_eq!(series.len(), ENV_SERIES_POINTS);

        for sample in &series {
            assert!(ENV_TEMPERATURE_RANGE_C.contains(&sample.temperature_c));
            assert!(ENV_HUMIDITY_RANGE_PCT.contains(&sample.humidity_pct));
            assert!(ENV_AIR_QUALITY_RANGE.contains(&sample.air_quality_index));
            assert!(ENV_CO2_RANGE_PPM.contains(&sample.co2_ppm));
        }
    }

    #[test]
    fn test_day_series_is_hourly_and_ends_now() {
        let before = Utc::now();
        let series = sample_day();
        let after = Utc::now();

        for pair in series.windows(2) {
            let gap = pair[1].taken_at - pair[0].taken_at;
            assert_eq!(gap, chrono::Duration::hours(1));
        }

        let last = series.last().unwrap().taken_at;
        assert!(last >= before);
        assert!(last <= after);
    }

    #[test]
    fn test_refresh_regenerates_whole_series() {
        let first = sample_day();
        let second = sample_day();
        assert_ne!(first[0].temperature_c, second[0].temperature_c);
    }

    #[test]
    fn test_impact_trajectory_decays_within_bounds() {
        let trajectory = impact_trajectory();
        assert_eq!(trajectory.len(), IMPACT_MONTHS);

        for (i, point) in trajectory.iter().enumerate() {
            let month = i as f64;
            assert_eq!(point.month_offset, i as u32);

            assert!(point.carbon_pct <= 100.0 - month * CARBON_DECAY_PER_MONTH);
            assert!(point.carbon_pct > 100.0 - month * CARBON_DECAY_PER_MONTH - DECAY_NOISE);
            assert!(point.water_pct <= 100.0 - month * WATER_DECAY_PER_MONTH);
            assert!(point.water_pct > 100.0 - month * WATER_DECAY_PER_MONTH - DECAY_NOISE);
            assert!(point.energy_pct <= 100.0 - month * ENERGY_DECAY_PER_MONTH);
            assert!(point.energy_pct > 100.0 - month * ENERGY_DECAY_PER_MONTH - DECAY_NOISE);
        }
    }

    #[test]
    fn test_impact_metrics_strictly_decrease() {
        let trajectory = impact_trajectory();
        for pair in trajectory.windows(2) {
            assert!(pair[1].carbon_pct < pair[0].carbon_pct);
            assert!(pair[1].water_pct < pair[0].water_pct);
            assert!(pair[1].energy_pct < pair[0].energy_pct);
        }
    }

    #[test]
    fn test_default_split_sums_to_100() {
        let total: f64 = DEFAULT_IMPACT_SPLIT.iter().map(|(_, pct)| pct).sum();
        assert_eq!(total, 100.0);
    }
}
