//! Nova Assistant API Client
//!
//! HTTP client for the chat completion API behind the Nova and ConservAI
//! panels. Explicitly constructed from runtime configuration; the API key
//! is a credential and is never baked into the binary.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Sampling temperature used for every chat request
const CHAT_TEMPERATURE: f32 = 0.7;

/// Reply shown to the user when a request fails
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again later.";

// ============================================================================
// PERSONAS
// ============================================================================

/// Which product voice answers the question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// Feature guide for the product site
    Nova,
    /// Environmental data analyst
    ConservAi,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Nova => "nova",
            Persona::ConservAi => "conserv-ai",
        }
    }

    /// Token budget per reply
    pub fn max_tokens(&self) -> u32 {
        match self {
            Persona::Nova => 150,
            Persona::ConservAi => 300,
        }
    }

    /// Canned first message shown before any request is made
    pub fn greeting(&self) -> &'static str {
        match self {
            Persona::Nova => {
                "Hi! I'm Nova, your AI assistant. I can help you learn about our features \
                 like Nova AI, Real-time Monitoring, Analytics, and AI Updates. What would \
                 you like to know?"
            }
            Persona::ConservAi => {
                "Hi! I'm ConservAI. Ask me to analyze environmental data, generate \
                 visualizations, or process conservation reports. Try:\n\n\
                 \u{2022} 'Show global temperature trends 2000-2023'\n\
                 \u{2022} 'Analyze renewable energy distribution'\n\
                 \u{2022} 'Upload a PDF for analysis'"
            }
        }
    }

    /// Wrap a user question in the persona preamble
    pub fn build_prompt(&self, question: &str) -> String {
        match self {
            Persona::Nova => format!(
                "You are Nova, the AI assistant for EcoByte. You help users understand our features:\n\
                 the idea is a project (IoT powered bin) that converts organic waste or biomass into \
                 biochar. The goal of this project is to reduce carbon emissions effectively. The \
                 project is in the development phase and the team is working on the following features:\n\
                 1. Nova AI: AI-powered insights and 3D visualization for environmental monitoring and decision making\n\
                 2. Real-time Monitoring: Live biochar production monitoring with IoT sensors and 3D model visualization\n\
                 3. Analytics: Production analytics and carbon offset tracking with detailed insights\n\
                 4. AI Updates: AI-powered waste classification and predictive analytics for optimization\n\n\
                 additional info (if needed):\n\
                 website name: EcoByte\n\
                 website URL: https://ecobyteai.vercel.app\n\
                 website creator/developer: EcoByte Team\n\
                 website purpose: To showcase the project idea and features\n\n\
                 User question: {}\n\n\
                 Respond in a helpful, friendly way. Keep responses very short and concise.",
                question
            ),
            Persona::ConservAi => format!(
                "You are ConservAI, a concise environmental analyst. Keep responses focused \
                 and include data when possible.\n\n\
                 User query: {}\n\n\
                 Guidelines:\n\
                 - Use 2-3 short sentences per point\n\
                 - Include specific numbers and trends\n\
                 - Format data for visualization\n\
                 - Maximum 3-4 key points",
                question
            ),
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Assistant API configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl AssistantConfig {
    /// Build from the environment; fails when no API key is configured
    pub fn from_env() -> Result<Self, AssistantError> {
        let api_key = constants::get_assistant_key().ok_or(AssistantError::MissingApiKey)?;
        Ok(Self::with_key(&api_key))
    }

    /// Config with an explicit key and defaults for everything else
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_url: constants::get_assistant_url(),
            api_key: api_key.to_string(),
            model: constants::get_assistant_model(),
            temperature: CHAT_TEMPERATURE,
            timeout_seconds: constants::get_assistant_timeout(),
        }
    }
}

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatApiRequest {
    message: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatApiResponse {
    text: String,
}

// ============================================================================
// CLIENT
// ============================================================================

/// Assistant API client
pub struct NovaClient {
    config: AssistantConfig,
    http_client: reqwest::Client,
}

impl NovaClient {
    /// Create new assistant client
    pub fn new(config: AssistantConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Ask one question in the given persona's voice
    pub async fn ask(&self, persona: Persona, question: &str) -> Result<String, AssistantError> {
        let url = format!("{}/v1/chat", self.config.api_url);

        let request = ChatApiRequest {
            message: persona.build_prompt(question),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: persona.max_tokens(),
        };

        log::info!(
            "[ASSISTANT] {} request ({} chars)",
            persona.as_str(),
            question.len()
        );

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            let result: ChatApiResponse = response
                .json()
                .await
                .map_err(|e| AssistantError::ParseError(e.to_string()))?;
            Ok(result.text)
        } else {
            Err(AssistantError::ApiError(response.status().as_u16()))
        }
    }

    /// Ask, replacing any failure with the canned fallback reply
    pub async fn ask_or_fallback(&self, persona: Persona, question: &str) -> String {
        match self.ask(persona, question).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("[ASSISTANT] {} request failed: {}", persona.as_str(), e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Assistant client errors
#[derive(Debug, Clone)]
pub enum AssistantError {
    MissingApiKey,
    NetworkError(String),
    ApiError(u16),
    ParseError(String),
}

impl std::fmt::Display for AssistantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "Assistant API key not configured"),
            Self::NetworkError(e) => write!(f, "Network error: {}", e),
            Self::ApiError(code) => write!(f, "Assistant API error: {}", code),
            Self::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for AssistantError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_token_budgets() {
        assert_eq!(Persona::Nova.max_tokens(), 150);
        assert_eq!(Persona::ConservAi.max_tokens(), 300);
    }

    #[test]
    fn test_prompt_wraps_question_in_preamble() {
        let prompt = Persona::Nova.build_prompt("What is biochar?");
        assert!(prompt.starts_with("You are Nova, the AI assistant for EcoByte."));
        assert!(prompt.contains("User question: What is biochar?"));
        assert!(prompt.ends_with("Keep responses very short and concise."));

        let prompt = Persona::ConservAi.build_prompt("Show temperature trends");
        assert!(prompt.starts_with("You are ConservAI, a concise environmental analyst."));
        assert!(prompt.contains("User query: Show temperature trends"));
        assert!(prompt.contains("- Maximum 3-4 key points"));
    }

    #[test]
    fn test_greetings_name_their_persona() {
        assert!(Persona::Nova.greeting().contains("I'm Nova"));
        assert!(Persona::ConservAi.greeting().contains("I'm ConservAI"));
    }

    #[test]
    fn test_request_serializes_expected_fields() {
        let request = ChatApiRequest {
            message: "hello".to_string(),
            model: "command-r".to_string(),
            temperature: 0.7,
            max_tokens: 150,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["message"], "hello");
        assert_eq!(value["model"], "command-r");
        assert_eq!(value["max_tokens"], 150);
    }

    #[test]
    fn test_config_with_key_keeps_defaults() {
        let config = AssistantConfig::with_key("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.temperature, CHAT_TEMPERATURE);
        assert!(!config.model.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_fallback() {
        let mut config = AssistantConfig::with_key("test-key");
        config.api_url = "http://127.0.0.1:9".to_string();
        config.timeout_seconds = 2;

        let client = NovaClient::new(config);
        let reply = client.ask_or_fallback(Persona::Nova, "anyone there?").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
