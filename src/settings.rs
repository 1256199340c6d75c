use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Where reports and photos are written.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Firebase,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Firebase => write!(f, "firebase"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    #[serde(default)]
    pub firebase_project_id: String,

    #[serde(default)]
    pub firebase_api_key: String,

    #[serde(default)]
    pub firebase_storage_bucket: String,

    #[serde(default = "default_firestore_database")]
    pub firestore_database: String,

    #[serde(default = "default_firestore_base_url")]
    pub firestore_base_url: String,

    #[serde(default = "default_storage_base_url")]
    pub storage_base_url: String,

    #[serde(default = "default_reports_collection")]
    pub reports_collection: String,

    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "SafeLink-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}
fn default_store_backend() -> StoreBackend {
    StoreBackend::Memory
}
fn default_firestore_database() -> String {
    "(default)".to_string()
}
fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}
fn default_storage_base_url() -> String {
    "https://firebasestorage.googleapis.com/v0".to_string()
}
fn default_reports_collection() -> String {
    "missingPersons".to_string()
}
fn default_image_prefix() -> String {
    "missing-persons".to_string()
}
fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            cors_allowed_origins: default_cors_origins(),
            log_format: default_log_format(),
            store_backend: default_store_backend(),
            firebase_project_id: String::new(),
            firebase_api_key: String::new(),
            firebase_storage_bucket: String::new(),
            firestore_database: default_firestore_database(),
            firestore_base_url: default_firestore_base_url(),
            storage_base_url: default_storage_base_url(),
            reports_collection: default_reports_collection(),
            image_prefix: default_image_prefix(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_base_url: default_gemini_base_url(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.gemini_api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            config.gemini_api_key = None;
        }

        config.validate()?;
        Ok(config)
    }

    /// Collects every configuration problem into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.store_backend == StoreBackend::Firebase {
            if self.firebase_project_id.trim().is_empty() {
                errors.push("FIREBASE_PROJECT_ID cannot be empty".into());
            }
            if self.firebase_storage_bucket.trim().is_empty() {
                errors.push("FIREBASE_STORAGE_BUCKET cannot be empty".into());
            }
            if self.firebase_api_key.trim().is_empty() {
                errors.push("FIREBASE_API_KEY cannot be empty".into());
            }
        }
        if self.reports_collection.trim().is_empty() || self.reports_collection.contains('/') {
            errors.push("REPORTS_COLLECTION must be a single collection id".into());
        }
        for (key, value) in [
            ("FIRESTORE_BASE_URL", &self.firestore_base_url),
            ("STORAGE_BASE_URL", &self.storage_base_url),
            ("GEMINI_BASE_URL", &self.gemini_base_url),
        ] {
            if !is_http_url(value) {
                errors.push(format!("{key} must be an http(s) URL"));
            }
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".into());
        }
        if self.is_production() && self.store_backend == StoreBackend::Memory {
            errors.push("The memory store backend is not allowed in production".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn guidance_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        self.as_deref().unwrap_or_default().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("log_format", &self.log_format)
            .field("store_backend", &self.store_backend)
            .field("firebase_project_id", &self.firebase_project_id)
            .field("firebase_api_key", &self.firebase_api_key.redact())
            .field("firebase_storage_bucket", &self.firebase_storage_bucket)
            .field("firestore_database", &self.firestore_database)
            .field("firestore_base_url", &self.firestore_base_url)
            .field("storage_base_url", &self.storage_base_url)
            .field("reports_collection", &self.reports_collection)
            .field("image_prefix", &self.image_prefix)
            .field("gemini_api_key", &self.gemini_api_key.redact())
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .finish()
    }
}
