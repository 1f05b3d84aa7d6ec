// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_DATABASE_URI: &str = "DATABASE_URI";
pub const ENV_CMS_SECRET: &str = "CMS_SECRET";
pub const ENV_WORKER_WEBHOOK_URL: &str = "WORKER_WEBHOOK_URL";
pub const ENV_WORKER_API_KEY: &str = "WORKER_API_KEY";
pub const ENV_REVALIDATION_SECRET: &str = "REVALIDATION_SECRET";
pub const ENV_SERVER_URL: &str = "SERVER_URL";

const MIN_CMS_SECRET_CHARS: usize = 16;
const MAX_TAG_SCAN_WINDOW: usize = 10_000;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub revalidation: RevalidationConfig,
    #[serde(default)]
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub database: DatabaseTarget,
    pub auth: AuthConfig,
    pub worker: WorkerConfig,
    pub revalidation: RevalidationConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ServerConfig {
    pub fn address_tuple(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Public base URL of the front end, used to build article links.
    #[serde(default)]
    pub server_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_uri")]
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: default_database_uri(),
        }
    }
}

fn default_database_uri() -> String {
    "file:data".to_string()
}

/// Where collections live once the connection string has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    Directory(PathBuf),
}

impl DatabaseTarget {
    pub fn parse(uri: &str, root: &Path) -> Result<Self, ConfigError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.uri cannot be empty".to_string(),
            ));
        }
        if uri.eq_ignore_ascii_case("memory:") || uri.eq_ignore_ascii_case("memory") {
            return Ok(DatabaseTarget::Memory);
        }

        let raw_path = if let Some(rest) = uri.strip_prefix("file://") {
            rest
        } else if let Some(rest) = uri.strip_prefix("file:") {
            rest
        } else if uri.contains("://") {
            return Err(ConfigError::ValidationError(format!(
                "Unsupported database.uri scheme: {}",
                uri
            )));
        } else {
            uri
        };

        if raw_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.uri must name a directory".to_string(),
            ));
        }

        let path = PathBuf::from(raw_path);
        let path = if path.is_absolute() {
            path
        } else {
            root.join(path)
        };
        Ok(DatabaseTarget::Directory(path))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub secret: String,
    #[serde(default = "default_auth_issuer")]
    pub issuer: String,
    #[serde(default = "default_auth_audience")]
    pub audience: String,
    #[serde(default = "default_auth_expiration_hours")]
    pub expiration_hours: u64,
    #[serde(default = "default_auth_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
    /// Account created with a random password when the user directory is
    /// empty at startup. Unset leaves the first account to `POST /api/users`.
    #[serde(default)]
    pub admin_email: Option<String>,
}

fn default_auth_issuer() -> String {
    "feedpress".to_string()
}

fn default_auth_audience() -> String {
    "feedpress-users".to_string()
}

fn default_auth_expiration_hours() -> u64 {
    12
}

fn default_auth_cookie_name() -> String {
    "feedpress_token".to_string()
}

fn default_secure_cookies() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorkerConfig {
    /// Endpoint notified when a post is created. Unset disables notifications.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Shared secret: sent as the notification bearer token and accepted as
    /// the bearer token for post deletion.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_worker_source_name")]
    pub source_name: String,
    /// Expected `X-Webhook-Source` on inbound article hooks.
    #[serde(default = "default_worker_inbound_source")]
    pub inbound_source: String,
    #[serde(default = "default_worker_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            api_key: None,
            source_name: default_worker_source_name(),
            inbound_source: default_worker_inbound_source(),
            timeout_seconds: default_worker_timeout_seconds(),
        }
    }
}

impl WorkerConfig {
    pub fn configured_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn default_worker_source_name() -> String {
    "feedpress-cms".to_string()
}

fn default_worker_inbound_source() -> String {
    "rss-worker".to_string()
}

fn default_worker_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RevalidationConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_revalidation_paths")]
    pub paths: Vec<String>,
}

impl Default for RevalidationConfig {
    fn default() -> Self {
        Self {
            secret: None,
            paths: default_revalidation_paths(),
        }
    }
}

impl RevalidationConfig {
    pub fn configured_secret(&self) -> Option<&str> {
        self.secret
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
    }
}

fn default_revalidation_paths() -> Vec<String> {
    vec!["/".to_string(), "/posts".to_string(), "/tags".to_string()]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_tag_scan_window")]
    pub tag_scan_window: usize,
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// When false, creating and updating posts require the same check as deletion.
    #[serde(default = "default_open_writes")]
    pub open_writes: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            tag_scan_window: default_tag_scan_window(),
            default_limit: default_page_limit(),
            max_limit: default_max_limit(),
            open_writes: default_open_writes(),
        }
    }
}

impl ContentConfig {
    /// Resolves a requested page size against the configured default and cap.
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => self.default_limit,
            Some(limit) => limit.min(self.max_limit),
        }
    }
}

fn default_tag_scan_window() -> usize {
    1000
}

fn default_page_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

fn default_open_writes() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Loads, applies environment overrides and validates. If validation fails,
    /// the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let mut config = Self::load(root)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate(root)
    }

    /// Environment variables win over the file. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(uri) = read(ENV_DATABASE_URI) {
            self.database.uri = uri;
        }
        if let Some(secret) = read(ENV_CMS_SECRET) {
            self.auth.secret = secret;
        }
        if let Some(url) = read(ENV_WORKER_WEBHOOK_URL) {
            self.worker.webhook_url = Some(url);
        }
        if let Some(key) = read(ENV_WORKER_API_KEY) {
            self.worker.api_key = Some(key);
        }
        if let Some(secret) = read(ENV_REVALIDATION_SECRET) {
            self.revalidation.secret = Some(secret);
        }
        if let Some(url) = read(ENV_SERVER_URL) {
            self.app.server_url = Some(url);
        }
    }

    pub fn validate(self, root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_auth(&self.auth)?;
        Self::validate_worker(&self.worker)?;
        Self::validate_content(&self.content)?;
        Self::validate_revalidation(&self.revalidation)?;

        let database = DatabaseTarget::parse(&self.database.uri, root)?;

        let mut app = self.app;
        if let Some(url) = app.server_url.as_ref() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationError(
                    "app.server_url must start with http:// or https://".to_string(),
                ));
            }
            app.server_url = Some(url.trim_end_matches('/').to_string());
        }

        if self.worker.webhook_url.is_some() && self.worker.configured_api_key().is_none() {
            warn!("worker.webhook_url is set without worker.api_key; notifications will be skipped");
        }
        if self.revalidation.configured_secret().is_none() {
            warn!("revalidation.secret is not configured; revalidation requests will be rejected");
        }

        Ok(ValidatedConfig {
            server: self.server,
            app,
            database,
            auth: self.auth,
            worker: self.worker,
            revalidation: self.revalidation,
            content: self.content,
            logging: self.logging,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
        if auth.secret.chars().count() < MIN_CMS_SECRET_CHARS {
            return Err(ConfigError::ValidationError(format!(
                "auth.secret must be at least {} characters",
                MIN_CMS_SECRET_CHARS
            )));
        }
        if auth.expiration_hours == 0 {
            return Err(ConfigError::ValidationError(
                "auth.expiration_hours must be at least 1".to_string(),
            ));
        }
        if auth.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.cookie_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_worker(worker: &WorkerConfig) -> Result<(), ConfigError> {
        if let Some(url) = worker.webhook_url.as_ref()
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(
                "worker.webhook_url must start with http:// or https://".to_string(),
            ));
        }
        if !(1..=300).contains(&worker.timeout_seconds) {
            return Err(ConfigError::ValidationError(format!(
                "worker.timeout_seconds must be between 1 and 300, got: {}",
                worker.timeout_seconds
            )));
        }
        if worker.source_name.trim().is_empty() || worker.inbound_source.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "worker.source_name and worker.inbound_source cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_content(content: &ContentConfig) -> Result<(), ConfigError> {
        if !(1..=MAX_TAG_SCAN_WINDOW).contains(&content.tag_scan_window) {
            return Err(ConfigError::ValidationError(format!(
                "content.tag_scan_window must be between 1 and {}, got: {}",
                MAX_TAG_SCAN_WINDOW, content.tag_scan_window
            )));
        }
        if content.max_limit == 0 {
            return Err(ConfigError::ValidationError(
                "content.max_limit must be greater than 0".to_string(),
            ));
        }
        if content.default_limit == 0 || content.default_limit > content.max_limit {
            return Err(ConfigError::ValidationError(format!(
                "content.default_limit must be between 1 and content.max_limit ({}), got: {}",
                content.max_limit, content.default_limit
            )));
        }
        Ok(())
    }

    fn validate_revalidation(revalidation: &RevalidationConfig) -> Result<(), ConfigError> {
        if let Some(path) = revalidation.paths.iter().find(|path| !path.starts_with('/')) {
            return Err(ConfigError::ValidationError(format!(
                "revalidation.paths entries must start with '/', got: {}",
                path
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const BASE_CONFIG: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
app:
  name: "FeedPress"
auth:
  secret: "0123456789abcdef0123456789abcdef"
logging:
  level: "info"
"#;

    fn base_config() -> Config {
        Config::parse(BASE_CONFIG).expect("base config parses")
    }

    #[test]
    fn defaults_fill_optional_sections() {
        let config = base_config();
        assert_eq!(config.database.uri, "file:data");
        assert_eq!(config.content.tag_scan_window, 1000);
        assert_eq!(config.content.default_limit, 10);
        assert!(config.content.open_writes);
        assert_eq!(config.worker.source_name, "feedpress-cms");
        assert_eq!(config.revalidation.paths, vec!["/", "/posts", "/tags"]);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = base_config();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DATABASE_URI, "memory:"),
            (ENV_WORKER_API_KEY, "worker-key"),
            (ENV_WORKER_WEBHOOK_URL, "https://worker.example.com/hook"),
            (ENV_REVALIDATION_SECRET, "reval"),
            (ENV_SERVER_URL, "https://news.example.com/"),
        ]);
        config.apply_env_overrides(|key| env.get(key).map(|value| value.to_string()));

        let validated = config.validate(Path::new("/srv/feedpress")).expect("valid");
        assert_eq!(validated.database, DatabaseTarget::Memory);
        assert_eq!(validated.worker.configured_api_key(), Some("worker-key"));
        assert_eq!(validated.revalidation.configured_secret(), Some("reval"));
        assert_eq!(
            validated.app.server_url.as_deref(),
            Some("https://news.example.com")
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = base_config();
        config.apply_env_overrides(|key| (key == ENV_WORKER_API_KEY).then(|| "  ".to_string()));
        assert!(config.worker.api_key.is_none());
    }

    #[test]
    fn database_uri_resolves_relative_directories() {
        let root = Path::new("/srv/feedpress");
        assert_eq!(
            DatabaseTarget::parse("file:data", root).unwrap(),
            DatabaseTarget::Directory(root.join("data"))
        );
        assert_eq!(
            DatabaseTarget::parse("file:///var/lib/feedpress", root).unwrap(),
            DatabaseTarget::Directory(PathBuf::from("/var/lib/feedpress"))
        );
        assert_eq!(
            DatabaseTarget::parse("state", root).unwrap(),
            DatabaseTarget::Directory(root.join("state"))
        );
    }

    #[test]
    fn database_uri_rejects_unknown_scheme() {
        let result = DatabaseTarget::parse("mongodb://localhost/news", Path::new("."));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut config = base_config();
        config.auth.secret = "short".to_string();
        assert!(config.validate(Path::new(".")).is_err());
    }

    #[test]
    fn default_limit_must_not_exceed_max() {
        let mut config = base_config();
        config.content.default_limit = 500;
        assert!(config.validate(Path::new(".")).is_err());
    }

    #[test]
    fn webhook_url_requires_http_scheme() {
        let mut config = base_config();
        config.worker.webhook_url = Some("ftp://worker".to_string());
        assert!(config.validate(Path::new(".")).is_err());
    }

    #[test]
    fn resolve_limit_caps_and_defaults() {
        let content = ContentConfig::default();
        assert_eq!(content.resolve_limit(None), 10);
        assert_eq!(content.resolve_limit(Some(0)), 10);
        assert_eq!(content.resolve_limit(Some(20)), 20);
        assert_eq!(content.resolve_limit(Some(5000)), 100);
    }
}
