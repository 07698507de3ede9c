use std::env;

use cardapio_api::{HttpApiConfig, QueryCache};
use cardapio_mealplan::WeekStart;
use cardapio_notification::reminder::ReminderSettings;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: HttpApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Local sqlite store holding the session and small client state
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_store_url() -> String {
    "sqlite:cardapio.db".to_string()
}

fn default_max_connections() -> u32 {
    1
}

/// In-memory cache of API reads, least recently used entries go first
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    QueryCache::DEFAULT_CAPACITY.get()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalendarConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            timezone: default_timezone(),
            locale: default_locale(),
        }
    }
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_locale() -> String {
    cardapio_mealplan::DEFAULT_LOCALE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            lead_minutes: default_lead_minutes(),
        }
    }
}

fn default_lead_minutes() -> u32 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (CARDAPIO__API__BASE_URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("api.base_url", "http://localhost:3000/api")?
            .set_default("store.url", default_store_url())?
            .set_default("store.max_connections", default_max_connections())?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CARDAPIO")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base_url must not be empty".to_string());
        }
        if self.api.timeout_secs == 0 || self.api.connect_timeout_secs == 0 {
            return Err("API timeouts must be greater than 0".to_string());
        }
        if self.store.max_connections < 1 {
            return Err("Store max_connections must be at least 1".to_string());
        }
        if self.cache.capacity < 1 {
            return Err("Cache capacity must be at least 1".to_string());
        }
        if self.calendar.timezone.trim().is_empty() {
            return Err("Calendar timezone must not be empty".to_string());
        }
        Ok(())
    }

    pub fn reminders(&self) -> ReminderSettings {
        ReminderSettings {
            lead_minutes: self.notification.lead_minutes,
            locale: self.calendar.locale.to_owned(),
            ..Default::default()
        }
    }
}
