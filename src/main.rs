//! EcoByte Core - Main Entry Point

mod constants;
mod logic;

use std::time::Duration;

use logic::analytics::AnalyticsEngine;
use logic::assistant::{suggest_chart, AssistantConfig, ChatTranscript, NovaClient, Persona};
use logic::classify::WasteClassifier;
use logic::environment::{self, DEFAULT_IMPACT_SPLIT};
use logic::telemetry::BinMonitor;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} core service v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    // --- Bin telemetry ---
    let monitor = BinMonitor::new();

    let preview = monitor.sample_once();
    log::info!(
        "[DASHBOARD] sensor preview: {:.1}°C, {:.1}kg waste in hopper",
        preview.temperature_c,
        preview.waste_input_kg
    );

    let reading_sub = monitor.subscribe(|reading, alerts| {
        log::info!(
            "[DASHBOARD] {:.1}°C | waste {:.1}kg | biochar {:.1}kg | CO2 offset {:.1}kg",
            reading.temperature_c,
            reading.waste_input_kg,
            reading.biochar_output_kg,
            reading.co2_offset_kg
        );
        // Newest first; keep the console readable by showing the top of the log
        for alert in alerts.iter().take(3) {
            log::info!(
                "[DASHBOARD] {} {} {}",
                alert
                    .created_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S"),
                alert.severity.label(),
                alert.message
            );
        }
        if alerts.len() > 3 {
            log::info!("[DASHBOARD] ... {} more alert(s) retained", alerts.len() - 3);
        }
    });

    let handle = monitor.start(Duration::from_millis(constants::get_tick_interval_ms()));

    // Prime the dashboard immediately instead of waiting out the first interval
    monitor.refresh();

    // --- Analytics feed ---
    let engine = AnalyticsEngine::new();
    let analytics_sub = engine.subscribe(|snapshot| {
        if let Some(point) = snapshot.forecast.last() {
            log::info!(
                "[FEED] forecast: predicted {:.1}kg, actual {:.1}kg ({} point(s))",
                point.predicted_kg,
                point.actual_kg,
                snapshot.forecast.len()
            );
        }
        let shares: Vec<String> = snapshot
            .composition
            .iter()
            .map(|slice| format!("{} {:.0}%", slice.name, slice.share_pct))
            .collect();
        log::info!("[FEED] composition: {}", shares.join(", "));
        if let Some(insight) = snapshot.insights.first() {
            log::info!("[FEED] insight: {}", insight.message);
        }
    });
    engine.start(Duration::from_millis(constants::get_analytics_interval_ms()));

    // --- One-shot panels ---
    let classifier = WasteClassifier::new();
    let classification = classifier.classify("intake batch 001").await;
    log::info!(
        "[CLASSIFY] {} filed as {} ({} material(s), {} handling step(s))",
        classification.sample_name,
        classification.category,
        classification.materials.len(),
        classification.recommendations.len()
    );

    let day = environment::sample_day();
    if let Some(latest) = day.last() {
        log::info!(
            "[ENV] {} hourly samples, latest: {:.1}°C, {:.0}% humidity, AQI {:.0}, CO2 {:.0}ppm",
            day.len(),
            latest.temperature_c,
            latest.humidity_pct,
            latest.air_quality_index,
            latest.co2_ppm
        );
    }

    let trajectory = environment::impact_trajectory();
    if let (Some(first), Some(last)) = (trajectory.first(), trajectory.last()) {
        log::info!(
            "[ENV] carbon footprint projected {:.0}% -> {:.0}% over {} months",
            first.carbon_pct,
            last.carbon_pct,
            trajectory.len()
        );
    }
    let split: Vec<String> = DEFAULT_IMPACT_SPLIT
        .iter()
        .map(|(name, pct)| format!("{} {}%", name, pct))
        .collect();
    log::info!("[ENV] impact split: {}", split.join(", "));

    // --- Assistant (needs a configured key) ---
    match AssistantConfig::from_env() {
        Ok(config) => {
            let client = NovaClient::new(config);
            let mut transcript = ChatTranscript::for_persona(Persona::Nova);

            let question = "What does EcoByte do?";
            let reply = client.ask_or_fallback(Persona::Nova, question).await;
            transcript.record_turn(question, &reply);

            if !transcript.is_empty() {
                log::info!("[ASSISTANT] transcript ({} message(s)):", transcript.len());
                for message in transcript.messages() {
                    log::info!("[ASSISTANT]   {}: {}", message.role.as_str(), message.content);
                }
            }
        }
        Err(e) => {
            log::info!("[ASSISTANT] disabled: {}", e);
            log::info!("[ASSISTANT] greeting on file: {}", Persona::Nova.greeting());
        }
    }

    // Chart extraction works on plain reply text, no API needed
    let sample_reply = "Stream share distribution: 45, 35, 15, 5 (survey year 2024)";
    if let Some(chart) = suggest_chart(sample_reply) {
        log::info!("[ASSISTANT] chart suggestion: {:?}", chart);
    }

    log::info!(
        "{} core service running. Press Ctrl+C to stop.",
        constants::APP_NAME
    );
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }

    // --- Shutdown ---
    reading_sub.unsubscribe();
    analytics_sub.unsubscribe();
    if monitor.is_running() {
        monitor.stop(&handle);
    }
    if engine.is_running() {
        engine.stop();
    }

    let status = monitor.status();
    log::info!(
        "[MONITOR] final state: {} ({} tick(s), {} alert(s) retained)",
        status.state.as_str(),
        status.ticks,
        status.retained_alerts
    );
    if let Some(reading) = monitor.latest_reading() {
        log::info!(
            "[MONITOR] last reading {:.1}°C at {}",
            reading.temperature_c,
            reading
                .captured_at
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
        );
    }

    let retained = monitor.alerts();
    if let Some(newest) = retained.first() {
        log::info!(
            "[MONITOR] newest alert on record: {} {}",
            newest.severity.label(),
            newest.message
        );
        monitor.clear_alerts();
    }

    log::info!("[ANALYTICS] {} feed tick(s) published", engine.ticks());
    log::info!("{} core service stopped.", constants::APP_NAME);
}
