//! Process configuration from environment variables

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Groq API key. Absence is startup-fatal.
    pub api_key: Option<String>,
    /// Chat model identifier.
    pub model: String,
    /// Base URL of the drug registry REST API.
    pub registry_base_url: String,
    /// Base URL of the OpenAI-compatible chat endpoint.
    pub llm_base_url: String,
    /// HTTP listen port.
    pub port: u16,
}

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://cima.aemps.es/cima";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("PROSPECTO_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            registry_base_url: std::env::var("CIMA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REGISTRY_BASE_URL.to_string()),
            llm_base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            port: std::env::var("PROSPECTO_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }
}
