use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// Reuse SessionSettings from clevers_core so the file and the client agree
use clevers_core::{DEFAULT_BASE_URL, DEFAULT_WRAPPER, SessionSettings};

const CONFIG_DIR: &str = "clevers";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub session: SessionSettings,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    #[serde(default = "ServiceConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "ServiceConfig::default_wrapper")]
    pub wrapper: String,
    #[serde(default = "ServiceConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            wrapper: Self::default_wrapper(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_wrapper() -> String {
        DEFAULT_WRAPPER.to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "RetryConfig::default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
            delay_ms: 0,
        }
    }
}

impl RetryConfig {
    const fn default_max_attempts() -> u32 {
        2
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'clevers init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your 27-character API key");
        println!("   2. Run 'clevers chat' to start a conversation");
        println!();
        println!("🔧 Configuration options:");
        println!("   - session.emotion / engagement / regard: mood dials 0-100, omit to leave unset");
        println!("   - service.timeout_secs: per-request timeout");
        println!("   - retry.max_attempts: attempts per message when a reply is malformed");
        println!();
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "session": {
    "api_key": "your-27-character-api-key"
  },
  "service": {
    "base_url": "https://www.cleverbot.com/getreply",
    "wrapper": "clevers",
    "timeout_secs": 30
  },
  "retry": {
    "max_attempts": 2,
    "delay_ms": 0
  }
}"#;
