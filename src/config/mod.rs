use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `session.json`. `None` resolves to `$HOME/.config/jobboard`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("JOBBOARD_API_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("JOBBOARD_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("JOBBOARD_USER_AGENT") {
            self.api.user_agent = v;
        }

        if let Ok(v) = env::var("JOBBOARD_CONFIG_DIR") {
            self.storage.dir = Some(PathBuf::from(v));
        }

        if let Ok(v) = env::var("JOBBOARD_DEBUG_LOGGING") {
            self.logging.debug_logging = v.parse().unwrap_or(self.logging.debug_logging);
        }

        self
    }

    /// Directory the session file lives in, without creating it.
    pub fn storage_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.storage.dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        Ok(PathBuf::from(home).join(".config").join("jobboard"))
    }

    /// Default `tracing` directive for the binary when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.logging.debug_logging {
            "jobboard_admin=debug,jobboard=debug"
        } else {
            "warn"
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                request_timeout_secs: 30,
                user_agent: concat!("jobboard-admin/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            storage: StorageConfig { dir: None },
            logging: LoggingConfig { debug_logging: true },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging-api.jobboard.example.com/api".to_string(),
                request_timeout_secs: 15,
                user_agent: concat!("jobboard-admin/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            storage: StorageConfig { dir: None },
            logging: LoggingConfig { debug_logging: false },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.jobboard.example.com/api".to_string(),
                request_timeout_secs: 10,
                user_agent: concat!("jobboard-admin/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            storage: StorageConfig { dir: None },
            logging: LoggingConfig { debug_logging: false },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
