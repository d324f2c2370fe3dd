use serde::Deserialize;

use crate::domain::workflow::WorkflowConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub workflow: WorkflowSettings,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Database settings; when no URL is configured the in-memory store is used
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret for signing JWTs
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_expiration_hours: u64,
}

/// Gemini backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Workflow tuning; explicit so per-deployment thresholds can differ
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSettings {
    pub score_threshold: f64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory exported documents are written to
    pub output_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_expiration_hours: 24,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            score_threshold: 7.5,
            max_attempts: 3,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: "exports".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Workflow settings in the shape the driver/machine constructors take
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            score_threshold: self.workflow.score_threshold,
            max_attempts: self.workflow.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.workflow.score_threshold, 7.5);
        assert_eq!(config.workflow.max_attempts, 3);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_workflow_config_conversion() {
        let config = AppConfig::default();
        let wf = config.workflow_config();
        assert_eq!(wf.score_threshold, 7.5);
        assert_eq!(wf.max_attempts, 3);
    }
}
