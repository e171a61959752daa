//! Dotted-key configuration lookup.
//!
//! Resolution order, per lookup:
//! 1. environment variable (`ai.openai.model` → `AI_OPENAI_MODEL`), even if empty
//! 2. the loaded TOML table, walked segment by segment
//! 3. the caller's default
//!
//! Nothing is cached beyond the loaded table; the environment is consulted on
//! every call.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::error::ConfigError;

/// Default daemon socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/muxgeist.sock";

/// Defaults used when no config file exists (also written by `config --init`).
pub const DEFAULT_CONFIG_TOML: &str = r#"[ai.anthropic]
model = "claude-3-5-sonnet-20241022"

[ai.openai]
model = "gpt-4o"

[ai.openrouter]
model = "anthropic/claude-3.5-sonnet"

[daemon]
socket_path = "/tmp/muxgeist.sock"

[ui]
pane_size = "40"
pane_title = "muxgeist"

[logging]
level = "INFO"
"#;

// ─── Environment ─────────────────────────────────────────────────

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// `ai.openai.model` → `AI_OPENAI_MODEL`.
pub fn env_key(key_path: &str) -> String {
    key_path.to_ascii_uppercase().replace('.', "_")
}

// ─── Providers ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    OpenAi,
    OpenRouter,
}

impl Provider {
    /// Detection order.
    pub const ALL: [Self; 3] = [Self::Anthropic, Self::OpenAi, Self::OpenRouter];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Variable checked before the config path, kept for older setups.
    pub fn legacy_key_var(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Model override variable, e.g. `OPENAI_MODEL`.
    pub fn model_var(self) -> String {
        format!("{}_MODEL", self.as_str().to_ascii_uppercase())
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::OpenAi => "gpt-4o",
            Self::OpenRouter => "anthropic/claude-3.5-sonnet",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "openrouter" => Ok(Self::OpenRouter),
            _ => Err(format!(
                "unsupported provider: {s} (use anthropic, openai, or openrouter)"
            )),
        }
    }
}

/// Whether a provider has a usable API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub provider: Provider,
    pub key_configured: bool,
    pub model: String,
}

// ─── Resolver ────────────────────────────────────────────────────

pub struct ConfigResolver {
    table: Table,
    env: Box<dyn EnvSource>,
    source: Option<PathBuf>,
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("keys", &self.table.keys().collect::<Vec<_>>())
            .field("source", &self.source)
            .finish()
    }
}

impl ConfigResolver {
    /// Resolver over an explicit table and environment.
    pub fn new(table: Table, env: impl EnvSource + 'static) -> Self {
        Self {
            table,
            env: Box::new(env),
            source: None,
        }
    }

    /// Built-in defaults over the given environment.
    pub fn with_defaults(env: impl EnvSource + 'static) -> Self {
        Self::new(default_table(), env)
    }

    /// Load from the default config path with the process environment.
    pub fn load() -> Self {
        match default_config_path() {
            Some(path) => Self::load_from(&path, ProcessEnv),
            None => {
                tracing::warn!("no home directory; using built-in config defaults");
                Self::with_defaults(ProcessEnv)
            }
        }
    }

    /// Load `path`. A missing, empty, or unreadable file falls back to the
    /// built-in defaults; a non-empty file replaces them entirely.
    pub fn load_from(path: &Path, env: impl EnvSource + 'static) -> Self {
        let table = match read_table(path) {
            Ok(Some(table)) if !table.is_empty() => {
                tracing::info!(path = %path.display(), "loaded config");
                table
            }
            Ok(_) => default_table(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load config file");
                default_table()
            }
        };
        Self {
            table,
            env: Box::new(env),
            source: Some(path.to_path_buf()),
        }
    }

    /// File this resolver was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Resolve a dotted key. An environment variable wins outright, even
    /// when set to the empty string.
    pub fn get(&self, key_path: &str) -> Option<Value> {
        if let Some(value) = self.env.var(&env_key(key_path)) {
            return Some(Value::String(value));
        }

        let mut segments = key_path.split('.');
        let first = segments.next()?;
        let mut current = self.table.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current.clone())
    }

    pub fn get_or(&self, key_path: &str, default: Value) -> Value {
        self.get(key_path).unwrap_or(default)
    }

    /// String form of a resolved scalar. Tables and arrays are not strings.
    pub fn get_string(&self, key_path: &str) -> Option<String> {
        match self.get(key_path)? {
            Value::String(s) => Some(s),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Datetime(d) => Some(d.to_string()),
            Value::Array(_) | Value::Table(_) => None,
        }
    }

    pub fn get_string_or(&self, key_path: &str, default: &str) -> String {
        self.get_string(key_path)
            .unwrap_or_else(|| default.to_string())
    }

    /// Daemon socket path (`daemon.socket_path`).
    pub fn socket_path(&self) -> String {
        self.get_string_or("daemon.socket_path", DEFAULT_SOCKET_PATH)
    }

    /// API key: the legacy variable when non-empty, then `ai.<provider>.api_key`.
    pub fn api_key(&self, provider: Provider) -> Option<String> {
        if let Some(key) = self.env.var(provider.legacy_key_var())
            && !key.is_empty()
        {
            return Some(key);
        }
        self.get_string(&format!("ai.{provider}.api_key"))
    }

    /// Model: `<PROVIDER>_MODEL` when non-empty, then `ai.<provider>.model`,
    /// then the built-in default.
    pub fn model(&self, provider: Provider) -> String {
        if let Some(model) = self.env.var(&provider.model_var())
            && !model.is_empty()
        {
            return model;
        }
        self.get_string_or(&format!("ai.{provider}.model"), provider.default_model())
    }

    /// First provider with a non-empty API key; Anthropic otherwise.
    pub fn detect_provider(&self) -> Provider {
        Provider::ALL
            .into_iter()
            .find(|p| self.api_key(*p).is_some_and(|k| !k.is_empty()))
            .unwrap_or(Provider::Anthropic)
    }

    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        Provider::ALL
            .into_iter()
            .map(|provider| ProviderStatus {
                provider,
                key_configured: self.api_key(provider).is_some_and(|k| !k.is_empty()),
                model: self.model(provider),
            })
            .collect()
    }
}

/// `~/.config/muxgeist/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("muxgeist").join("config.toml"))
}

/// The built-in defaults as a table.
pub fn default_table() -> Table {
    DEFAULT_CONFIG_TOML.parse::<Table>().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "built-in config defaults failed to parse");
        Table::new()
    })
}

/// Write the defaults to `path`, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(&default_table())?;
    std::fs::write(path, rendered)?;
    tracing::info!(path = %path.display(), "created default config");
    Ok(())
}

fn read_table(path: &Path) -> Result<Option<Table>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    Ok(Some(text.parse::<Table>()?))
}
