//! Scout Configuration
//!
//! Credentials come from the environment (a `.env` file is honored via
//! `dotenvy`). Both API keys are required; startup aborts with a listing
//! of whatever is missing before any conversation state is created.

use std::env;

use anyhow::{bail, Result};

/// Environment variables that must be present at startup.
pub const REQUIRED_ENV_VARS: &[&str] = &["GROQ_API_KEY", "TAVILY_API_KEY"];

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default base URL for the Groq OpenAI-compatible API.
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai";

/// Default base URL for the Tavily search API.
pub const DEFAULT_TAVILY_API_URL: &str = "https://api.tavily.com";

/// Default iteration cap for one query.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Runtime settings resolved from the environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub tavily_api_key: String,
    pub tavily_api_url: String,
    pub model: String,
}

/// Which of `names` are unset (or empty) in the environment.
fn missing_vars_in(names: &[&'static str]) -> Vec<&'static str> {
    names
        .iter()
        .copied()
        .filter(|name| env::var(name).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect()
}

/// The required credential variables currently absent from the environment.
pub fn missing_env_vars() -> Vec<&'static str> {
    missing_vars_in(REQUIRED_ENV_VARS)
}

/// Load settings from the environment.
///
/// Fails with a listing of every missing required variable. Optional
/// overrides: `GROQ_API_URL`, `TAVILY_API_URL`, `GROQ_MODEL`.
pub fn load_settings() -> Result<Settings> {
    let missing = missing_env_vars();
    if !missing.is_empty() {
        bail!(
            "Missing required environment variables: {}\nPlease set them in your .env file",
            missing.join(", ")
        );
    }

    Ok(Settings {
        groq_api_key: env::var("GROQ_API_KEY")?,
        groq_api_url: env::var("GROQ_API_URL")
            .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string()),
        tavily_api_key: env::var("TAVILY_API_KEY")?,
        tavily_api_url: env::var("TAVILY_API_URL")
            .unwrap_or_else(|_| DEFAULT_TAVILY_API_URL.to_string()),
        model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
    })
}
