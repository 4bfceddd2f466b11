//! Runtime configuration, read once from the environment at startup.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Environment variable holding the completion endpoint URL.
pub const SERVER_ENV_VAR: &str = "AI_SERVER";
/// Environment variable holding the model identifier.
pub const MODEL_ENV_VAR: &str = "AI_MODEL";
/// Environment variable holding an optional bearer token.
pub const API_KEY_ENV_VAR: &str = "AI_API_KEY";
/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "AI_TIMEOUT";

pub const DEFAULT_SERVER: &str = "http://localhost:11434/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-r1:32b";

/// Settings for the completion endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub model: String,
    pub api_key: Option<String>,
    /// No timeout is applied when `None`.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

impl Config {
    /// Build the configuration from `AI_SERVER`, `AI_MODEL`, `AI_API_KEY` and
    /// `AI_TIMEOUT`. Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: non_empty_var(SERVER_ENV_VAR).unwrap_or(defaults.server),
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or(defaults.model),
            api_key: non_empty_var(API_KEY_ENV_VAR),
            timeout: read_timeout(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Logs a warning if the variable is set but is not a whole number of seconds.
fn read_timeout() -> Option<Duration> {
    let raw = non_empty_var(TIMEOUT_ENV_VAR)?;
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(
                "Invalid {} value '{}', requests will not time out",
                TIMEOUT_ENV_VAR, raw
            );
            None
        }
    }
}
