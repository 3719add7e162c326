//! Logic Module - Business Logic & Engines
//!
//! The EcoByte engines: bin telemetry pipeline, analytics feed, simulated
//! waste classifier, environment sampling, and the Nova assistant client.

// Core modules
pub mod analytics;
pub mod assistant;
pub mod classify;
pub mod environment;
pub mod telemetry;
