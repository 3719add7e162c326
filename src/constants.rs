//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a cadence or endpoint default, only edit this file.

/// Default bin monitor tick interval (milliseconds)
///
/// The hardware panels refreshed every 3-5 seconds; the reactor bin
/// telemetry uses the slow end of that band.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5000;

/// Default analytics feed tick interval (milliseconds)
pub const DEFAULT_ANALYTICS_INTERVAL_MS: u64 = 3000;

/// Maximum retained bin alerts (newest first)
pub const DEFAULT_ALERT_LOG_CAPACITY: usize = 50;

/// Maximum retained analytics insights (newest first)
pub const DEFAULT_INSIGHT_FEED_CAPACITY: usize = 5;

/// Simulated classifier latency (milliseconds)
pub const DEFAULT_CLASSIFY_LATENCY_MS: u64 = 2000;

/// Default Nova assistant API base URL
///
/// This is the fallback URL when no environment variable is set.
pub const DEFAULT_ASSISTANT_URL: &str = "https://api.cohere.ai";

/// Default Nova assistant chat model
pub const DEFAULT_ASSISTANT_MODEL: &str = "command-r";

/// Default Nova assistant request timeout (seconds)
pub const DEFAULT_ASSISTANT_TIMEOUT: u64 = 30;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "EcoByte";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get bin monitor tick interval from environment or use default
pub fn get_tick_interval_ms() -> u64 {
    std::env::var("ECOBYTE_TICK_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICK_INTERVAL_MS)
}

/// Get analytics feed tick interval from environment or use default
pub fn get_analytics_interval_ms() -> u64 {
    std::env::var("ECOBYTE_ANALYTICS_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_ANALYTICS_INTERVAL_MS)
}

/// Get simulated classifier latency from environment or use default
pub fn get_classify_latency_ms() -> u64 {
    std::env::var("ECOBYTE_CLASSIFY_LATENCY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CLASSIFY_LATENCY_MS)
}

/// Get Nova assistant API base URL from environment or use default
pub fn get_assistant_url() -> String {
    std::env::var("ECOBYTE_ASSISTANT_URL")
        .unwrap_or_else(|_| DEFAULT_ASSISTANT_URL.to_string())
}

/// Get Nova assistant chat model from environment or use default
pub fn get_assistant_model() -> String {
    std::env::var("ECOBYTE_ASSISTANT_MODEL")
        .unwrap_or_else(|_| DEFAULT_ASSISTANT_MODEL.to_string())
}

/// Get Nova assistant API key from environment
///
/// There is deliberately no default. The key is a credential and must be
/// supplied at runtime; a missing key disables the assistant.
pub fn get_assistant_key() -> Option<String> {
    std::env::var("ECOBYTE_ASSISTANT_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Get Nova assistant request timeout from environment or use default
pub fn get_assistant_timeout() -> u64 {
    std::env::var("ECOBYTE_ASSISTANT_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_ASSISTANT_TIMEOUT)
}
