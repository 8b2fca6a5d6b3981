//! Engine configuration from environment variables.

use std::path::Path;
use std::str::FromStr;

use crate::infrastructure::openai::{DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};

/// Where chat lines come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueBackend {
    /// Canned lines keyed by vibe
    #[default]
    Static,
    /// Generated per turn by the LLM
    Llm,
}

impl FromStr for DialogueBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" | "table" => Ok(Self::Static),
            "llm" | "openai" => Ok(Self::Llm),
            other => Err(format!("unknown dialogue backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    /// `(url, key)` when a Supabase project is configured
    pub supabase: Option<(String, String)>,
    pub replicate_api_token: Option<String>,
    pub chat_duration_secs: Option<u32>,
    pub battle_duration_secs: Option<u32>,
    pub dialogue_backend: DialogueBackend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: None,
            supabase: None,
            replicate_api_token: None,
            chat_duration_secs: None,
            battle_duration_secs: None,
            dialogue_backend: DialogueBackend::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset and
    /// unparseable numbers fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secs = |key: &str| {
            get(key).and_then(|raw| match raw.parse::<u32>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    tracing::warn!(key, value = %raw, "Ignoring invalid duration");
                    None
                }
            })
        };

        let dialogue_backend = match get("DIALOGUE_BACKEND") {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Falling back to static dialogue");
                DialogueBackend::Static
            }),
            None => DialogueBackend::Static,
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some((url, key)),
            _ => None,
        };

        Self {
            llm_base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.into()),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.into()),
            llm_api_key: get("LLM_API_KEY"),
            supabase,
            replicate_api_token: get("REPLICATE_API_TOKEN"),
            chat_duration_secs: secs("CHAT_DURATION_SECS"),
            battle_duration_secs: secs("BATTLE_DURATION_SECS"),
            dialogue_backend,
        }
    }
}

/// Load `.env.local` then `.env` from the workspace root, if present.
///
/// Variables already set in the process environment win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
