use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from fraudscope.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub system: SystemConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// System-level configuration for the model package
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemConfig {
    pub model_path: String,
    /// When true, a missing or invalid model package fails startup instead of
    /// falling back to the built-in demonstration package
    pub model_strict: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            model_path: "fraud_model.json".to_string(),
            model_strict: false,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub http_bind: std::net::SocketAddr,
    /// Base URL the CLI client submits against
    pub endpoint: String,
    /// Client-side request timeout for the submission handler
    pub http_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "fraudscope=info".to_string(),
            http_bind: "127.0.0.1:8787"
                .parse()
                .expect("default bind address should parse"),
            endpoint: "http://127.0.0.1:8787".to_string(),
            http_timeout_ms: 10_000,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("FRAUD_LOG") {
            if !level.trim().is_empty() {
                config.log_level = level;
            }
        }

        if let Ok(bind) = std::env::var("FRAUD_HTTP_BIND") {
            match bind.parse() {
                Ok(addr) => config.http_bind = addr,
                Err(_) => tracing::warn!(
                    "FRAUD_HTTP_BIND '{}' is not a valid socket address, using {}",
                    bind,
                    config.http_bind
                ),
            }
        }

        if let Ok(endpoint) = std::env::var("FRAUD_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }

        if let Some(timeout_ms) = std::env::var("FRAUD_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.http_timeout_ms = timeout_ms.clamp(100, 120_000);
        }

        config
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses FRAUDSCOPE_CONFIG environment variable or defaults to "fraudscope.toml"
    pub fn load() -> anyhow::Result<Self> {
        // Load environment variables: FRAUD_ENV_FILE if set, else ./.env
        if let Ok(env_path) = std::env::var("FRAUD_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("FRAUDSCOPE_CONFIG")
            .unwrap_or_else(|_| "fraudscope.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides for the model package (env-first)
        if let Ok(model_path) = std::env::var("FRAUD_MODEL_PATH") {
            config.system.model_path = model_path;
        }
        if let Ok(strict) = std::env::var("FRAUD_MODEL_STRICT") {
            config.system.model_strict = strict == "1" || strict.eq_ignore_ascii_case("true");
        }

        // Load runtime configuration from environment variables
        config.runtime = RuntimeConfig::load_from_env();

        if config.system.model_path.trim().is_empty() {
            tracing::warn!("model_path is empty, using default fraud_model.json");
            config.system.model_path = SystemConfig::default().model_path;
        }

        Ok(config)
    }
}
