//! Application configuration for the MediBuddy server.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `MEDIBUDDY_`:
/// - `MEDIBUDDY_HOST`: Server bind address (default: "0.0.0.0")
/// - `MEDIBUDDY_PORT`: Server port (default: 8080)
/// - `MEDIBUDDY_DEBUG`: Enable debug mode (default: false)
/// - `MEDIBUDDY_SERVER_NAME`: Server name for identification
/// - `MEDIBUDDY_CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins
/// - `MEDIBUDDY_LOG_JSON`: Emit logs as JSON lines (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable debug mode
    #[serde(default)]
    pub debug: bool,

    /// Server name for identification
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Comma-separated CORS origins
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,

    /// JSON log output
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_server_name() -> String {
    "medibuddy-server".to_string()
}

fn default_cors_allowed_origins() -> String {
    "http://localhost:5173".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MEDIBUDDY_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("MEDIBUDDY_").from_env::<AppConfig>()
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed CORS origins, trimmed, with empty entries dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            server_name: default_server_name(),
            cors_allowed_origins: default_cors_allowed_origins(),
            log_json: false,
        }
    }
}
