//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, ExportConfig, LlmConfig, LogFormat, LoggingConfig,
    ServerConfig, WorkflowSettings,
};
