//! Assistant Module
//!
//! Chat assistant integration for the Nova and ConservAI panels.
//!
//! Structure:
//! - client: API configuration, personas and the HTTP chat client
//! - transcript: conversation history seeded with persona greetings
//! - viz: chart suggestions extracted from reply text

pub mod client;
pub mod transcript;
pub mod viz;

pub use client::{AssistantConfig, AssistantError, NovaClient, Persona, FALLBACK_REPLY};
pub use transcript::{ChatMessage, ChatRole, ChatTranscript};
pub use viz::{suggest_chart, ChartSuggestion};
