//! Service configuration.
//!
//! Everything is read from the environment once at startup. A `.env` file in
//! the working directory is honoured, but variables already set win.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AppError, AppResult};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8090;
const DEFAULT_GRAPH_URL: &str = "http://localhost:7474";
const DEFAULT_GRAPH_DATABASE: &str = "neo4j";
const DEFAULT_QUERY_DIR: &str = "queries";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name reported in logs and response metadata.
    pub service_name: String,
    pub host: String,
    pub port: u16,
    /// Directory holding the query template files.
    pub query_dir: PathBuf,
    pub graph: GraphDbConfig,
}

/// Graph database endpoint settings.
#[derive(Debug, Clone)]
pub struct GraphDbConfig {
    /// Base URL of the REST interface, e.g. `http://localhost:7474`.
    pub url: String,
    /// Database name used in the transaction endpoint path.
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl GraphDbConfig {
    /// Basic-auth credentials, only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load_with_service(service_name: &str) -> AppResult<Self> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("SERVER_PORT 不是合法端口: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let timeout = match var("GRAPH_DB_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("GRAPH_DB_TIMEOUT_SECS 不是合法秒数: {raw}"))
            })?)),
            None => None,
        };

        let url = var("GRAPH_DB_URL").unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string());
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Config(format!("GRAPH_DB_URL 必须以 http:// 或 https:// 开头: {url}")));
        }

        Ok(Self {
            service_name: service_name.to_string(),
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            query_dir: var("QUERY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QUERY_DIR)),
            graph: GraphDbConfig {
                url: url.trim_end_matches('/').to_string(),
                database: var("GRAPH_DB_NAME").unwrap_or_else(|| DEFAULT_GRAPH_DATABASE.to_string()),
                username: var("GRAPH_DB_USER"),
                password: var("GRAPH_DB_PASSWORD"),
                timeout,
            },
        })
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load a `.env` file (best-effort, no error if missing).
pub fn load_dotenv(path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set by the environment
        if std::env::var(&key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

/// Strips one pair of matching surrounding quotes; unbalanced quotes are kept.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .unwrap_or(value)
}
