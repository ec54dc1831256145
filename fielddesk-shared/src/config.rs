//! Layered console configuration: defaults, optional YAML/JSON file, and
//! `FIELDDESK_*` environment overrides.

use std::{env, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{Capabilities, OperatorSession};

/// Backend endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the console REST API, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    /// Optional bearer token attached to every request.
    pub token: Option<String>,
    /// Prefix under which attachment paths are served.
    pub storage_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            token: None,
            storage_prefix: "http://localhost:8000/storage".to_string(),
        }
    }
}

/// Polling cadence and page limits for the chat module.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    /// Seconds between background refreshes of the thread directory.
    pub directory_poll_secs: u64,
    /// Seconds between background refreshes of the open room.
    pub thread_poll_secs: u64,
    /// Top-N threads fetched per directory refresh, by recency.
    pub directory_page_size: u32,
    /// Most-recent-N messages fetched per room refresh.
    pub thread_page_size: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            directory_poll_secs: 15,
            thread_poll_secs: 5,
            directory_page_size: 50,
            thread_page_size: 100,
        }
    }
}

/// Operator identity and capabilities injected into the chat module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OperatorConfig {
    pub id: String,
    pub name: String,
    pub role: String,
    pub can_delete: bool,
    pub can_moderate_thread: bool,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            id: "admin".to_string(),
            name: "Operations Console".to_string(),
            role: "admin".to_string(),
            can_delete: true,
            can_moderate_thread: true,
        }
    }
}

/// The main configuration structure for the FieldDesk console.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub operator: OperatorConfig,
    pub log_level: String,
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api: ApiConfig::default(),
            chat: ChatConfig::default(),
            operator: OperatorConfig::default(),
            log_level: "info".to_string(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Errors
    /// Returns an error for an unreadable or unsupported file, or when the
    /// resolved configuration fails validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config = if let Some(path) = config_path {
            let content = fs::read_to_string(&path)?;
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => {
                    return Err("Unsupported configuration format. Use 'yaml' or 'json'.".into());
                }
            }
        } else {
            Config::with_defaults()
        };

        config.apply_env_overrides();

        if let Err(errors) = config.validate() {
            return Err(errors.join("; ").into());
        }

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = env::var("FIELDDESK_API_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(token) = env::var("FIELDDESK_API_TOKEN") {
            self.api.token = Some(token);
        }
        if let Ok(prefix) = env::var("FIELDDESK_STORAGE_PREFIX") {
            self.api.storage_prefix = prefix;
        }
        if let Ok(log_level) = env::var("FIELDDESK_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(id) = env::var("FIELDDESK_OPERATOR_ID") {
            self.operator.id = id;
        }
        if let Ok(name) = env::var("FIELDDESK_OPERATOR_NAME") {
            self.operator.name = name;
        }
        if let Ok(role) = env::var("FIELDDESK_OPERATOR_ROLE") {
            self.operator.role = role;
        }
    }

    /// Validates the resolved configuration.
    ///
    /// # Errors
    /// Returns every validation failure, one message per problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match Url::parse(&self.api.base_url) {
            Ok(url) if url.cannot_be_a_base() => {
                errors.push(format!(
                    "API base URL must be hierarchical (http/https): {}",
                    self.api.base_url
                ));
            }
            Ok(_) => {}
            Err(_) => errors.push(format!("Invalid API base URL: {}", self.api.base_url)),
        }
        if self.chat.directory_poll_secs == 0 {
            errors.push("directory_poll_secs must be greater than 0".to_string());
        }
        if self.chat.thread_poll_secs == 0 {
            errors.push("thread_poll_secs must be greater than 0".to_string());
        }
        if self.chat.directory_page_size == 0 {
            errors.push("directory_page_size must be greater than 0".to_string());
        }
        if self.chat.thread_page_size == 0 {
            errors.push("thread_page_size must be greater than 0".to_string());
        }
        if self.operator.id.trim().is_empty() {
            errors.push("operator.id must not be empty".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// The operator identity to inject into the chat module.
    #[must_use]
    pub fn operator_session(&self) -> OperatorSession {
        OperatorSession {
            id: self.operator.id.clone(),
            name: self.operator.name.clone(),
            role: self.operator.role.clone(),
        }
    }

    /// The moderation capabilities to inject into the chat module.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_delete: self.operator.can_delete,
            can_moderate_thread: self.operator.can_moderate_thread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "FIELDDESK_API_BASE_URL",
            "FIELDDESK_API_TOKEN",
            "FIELDDESK_STORAGE_PREFIX",
            "FIELDDESK_LOG_LEVEL",
            "FIELDDESK_OPERATOR_ID",
            "FIELDDESK_OPERATOR_NAME",
            "FIELDDESK_OPERATOR_ROLE",
        ] {
            // Test-only: isolates each case from leaked overrides.
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_resolve_without_file() {
        clear_env();
        let config = Config::load_config(None).unwrap();
        assert_eq!(config.chat.directory_poll_secs, 15);
        assert_eq!(config.chat.thread_poll_secs, 5);
        assert_eq!(config.chat.directory_page_size, 50);
        assert_eq!(config.chat.thread_page_size, 100);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn partial_yaml_file_inherits_defaults() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api:\n  base_url: https://ops.example.com/api\nchat:\n  thread_poll_secs: 2"
        )
        .unwrap();

        let config = Config::load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "https://ops.example.com/api");
        assert_eq!(config.chat.thread_poll_secs, 2);
        assert_eq!(config.chat.directory_poll_secs, 15);
    }

    #[test]
    #[serial]
    fn env_overrides_file_and_defaults() {
        clear_env();
        // Test-only: serial execution keeps this race-free.
        unsafe {
            env::set_var("FIELDDESK_API_BASE_URL", "https://env.example.com/api");
            env::set_var("FIELDDESK_OPERATOR_ID", "OPS-077");
        }

        let config = Config::load_config(None).unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com/api");
        assert_eq!(config.operator.id, "OPS-077");
        clear_env();
    }

    #[test]
    #[serial]
    fn zero_interval_fails_validation() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "chat:\n  thread_poll_secs: 0").unwrap();

        let result = Config::load_config(Some(file.path().to_path_buf()));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("thread_poll_secs must be greater than 0")
        );
    }

    #[test]
    #[serial]
    fn unsupported_extension_is_rejected() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        assert!(Config::load_config(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    #[serial]
    fn session_and_capabilities_come_from_operator_section() {
        clear_env();
        let mut config = Config::with_defaults();
        config.operator.id = "OPS-001".to_string();
        config.operator.can_delete = false;

        let session = config.operator_session();
        assert_eq!(session.id, "OPS-001");

        let capabilities = config.capabilities();
        assert!(!capabilities.can_delete);
        assert!(capabilities.can_moderate_thread);
    }
}
