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

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub admin_user: String,

    #[serde(default)]
    pub admin_pass: String,

    #[serde(default)]
    pub supabase_url: Option<String>,

    #[serde(default)]
    pub supabase_service_role: Option<String>,

    #[serde(default)]
    pub supabase_bucket: Option<String>,

    #[serde(default = "default_json_limit")]
    pub json_limit_bytes: usize,
}

/// Borrowed Supabase settings, present only when all three values are set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupabaseSettings<'a> {
    pub url: &'a str,
    pub service_role: &'a str,
    pub bucket: &'a str,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
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
fn default_json_limit() -> usize {
    2 * 1024 * 1024
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.admin_user = fill_or_env(config.admin_user, "APP_ADMIN_USER")?;
        config.admin_pass = fill_or_env(config.admin_pass, "APP_ADMIN_PASS")?;

        // Supabase keeps its conventional unprefixed names as a fallback
        config.supabase_url = config.supabase_url.or_else(|| non_empty_env("SUPABASE_URL"));
        config.supabase_service_role = config
            .supabase_service_role
            .or_else(|| non_empty_env("SUPABASE_SERVICE_ROLE"));
        config.supabase_bucket = config.supabase_bucket.or_else(|| non_empty_env("SUPABASE_BUCKET"));

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.admin_user.trim().is_empty() {
            errors.push("ADMIN_USER cannot be empty");
        }
        if self.admin_pass.is_empty() {
            errors.push("ADMIN_PASS cannot be empty");
        }
        if self.json_limit_bytes == 0 {
            errors.push("JSON_LIMIT_BYTES must be positive");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        let supabase_parts = [
            &self.supabase_url,
            &self.supabase_service_role,
            &self.supabase_bucket,
        ];
        let configured = supabase_parts.iter().filter(|part| part.is_some()).count();
        if configured != 0 && configured != supabase_parts.len() {
            errors.push("SUPABASE_URL, SUPABASE_SERVICE_ROLE and SUPABASE_BUCKET must be set together");
        }
        if let Some(url) = &self.supabase_url {
            if url::Url::parse(url).is_err() {
                errors.push("SUPABASE_URL must be a valid URL");
            }
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

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn supabase(&self) -> Option<SupabaseSettings<'_>> {
        Some(SupabaseSettings {
            url: self.supabase_url.as_deref()?,
            service_role: self.supabase_service_role.as_deref()?,
            bucket: self.supabase_bucket.as_deref()?,
        })
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
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
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("admin_user", &self.admin_user)
            .field("admin_pass", &self.admin_pass.redact())
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_role", &self.supabase_service_role.redact())
            .field("supabase_bucket", &self.supabase_bucket)
            .field("json_limit_bytes", &self.json_limit_bytes)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio-API Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/portfolio_test".to_string(),
        cors_allowed_origins: vec!["*".to_string()],
        admin_user: "admin".to_string(),
        admin_pass: "s3cret".to_string(),
        supabase_url: None,
        supabase_service_role: None,
        supabase_bucket: None,
        json_limit_bytes: default_json_limit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_collects_every_problem() {
        let config = AppConfig {
            database_url: String::new(),
            admin_pass: String::new(),
            ..test_config()
        };

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("DATABASE_URL cannot be empty"));
        assert!(message.contains("ADMIN_PASS cannot be empty"));
    }

    #[test]
    fn wildcard_cors_is_rejected_in_production() {
        let config = AppConfig {
            env: AppEnvironment::Production,
            ..test_config()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            env: AppEnvironment::Production,
            cors_allowed_origins: vec!["https://me.dev, https://admin.me.dev".into()],
            ..test_config()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.cors_origins(), vec!["https://me.dev", "https://admin.me.dev"]);
    }

    #[test]
    fn supabase_settings_are_all_or_nothing() {
        let partial = AppConfig {
            supabase_url: Some("https://abc.supabase.co".into()),
            ..test_config()
        };
        assert!(partial.validate().is_err());
        assert!(partial.supabase().is_none());

        let full = AppConfig {
            supabase_url: Some("https://abc.supabase.co".into()),
            supabase_service_role: Some("role".into()),
            supabase_bucket: Some("portfolio".into()),
            ..test_config()
        };
        assert!(full.validate().is_ok());
        assert_eq!(full.supabase().map(|s| s.bucket), Some("portfolio"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = AppConfig {
            supabase_service_role: Some("super-secret-role".into()),
            ..test_config()
        };
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("super-secret-role"));
        assert!(!rendered.contains("postgres://"));
    }

    #[test]
    fn environment_names_parse_case_insensitively() {
        assert_eq!("Production".parse::<AppEnvironment>().unwrap(), AppEnvironment::Production);
        assert!("staging".parse::<AppEnvironment>().is_err());
    }
}
