use actix_web::cookie::SameSite;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "server/config/server.toml";

/// Deployment environment, taken from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        env::var("NODE_ENV")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Production serves a cross-site frontend over HTTPS.
    pub fn cookie_secure(self) -> bool {
        self.is_production()
    }

    pub fn cookie_same_site(self) -> SameSite {
        if self.is_production() {
            SameSite::None
        } else {
            SameSite::Strict
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Atlas cluster host used when no explicit URI is configured.
    pub cluster_host: String,
    pub name: String,
    pub uri: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongodb,
            cluster_host: "cluster0.mquj3zk.mongodb.net".to_string(),
            name: "WorkWizards".to_string(),
            uri: None,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_uri(&self, credentials: &Credentials) -> Result<String> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        let (user, pass) = match (&credentials.db_user, &credentials.db_pass) {
            (Some(user), Some(pass)) => (user, pass),
            _ => {
                return Err(AppError::Config(
                    "DB_USER and DB_PASS must be set when MONGODB_URI is not".to_string(),
                ))
            }
        };

        Ok(format!(
            "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
            urlencoding::encode(user),
            urlencoding::encode(pass),
            self.cluster_host
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://work-wizards-1014.web.app".to_string(),
                "https://work-wizards-1014.firebaseapp.com".to_string(),
            ],
            max_age: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    #[serde(skip)]
    pub environment: Environment,
}

impl ServerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Loads the file at `CONFIG_PATH` (falling back to defaults when it is
    /// missing) and applies environment overrides.
    pub fn load() -> Self {
        let config_path =
            env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::load_from_file(&config_path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to load server config from '{}': {}. Falling back to defaults.",
                config_path,
                e
            );
            Self::default()
        });
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        if let Some(host) = non_empty_var("SERVER_HOST") {
            self.http.host = host;
        }
        if let Some(port) = non_empty_var("PORT").and_then(|s| s.parse().ok()) {
            self.http.port = port;
        }
        if let Some(uri) = non_empty_var("MONGODB_URI") {
            self.database.uri = Some(uri);
        }
        if let Some(name) = non_empty_var("DATABASE_NAME") {
            self.database.name = name;
        }
        if let Some(origins) = non_empty_var("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        self.environment = Environment::from_env();
    }
}

/// Secrets read only from the process environment.
#[derive(Clone)]
pub struct Credentials {
    pub secret_key: String,
    pub db_user: Option<String>,
    pub db_pass: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let secret_key = non_empty_var("SECRET_KEY")
            .ok_or_else(|| AppError::Config("SECRET_KEY must be set".to_string()))?;

        Ok(Self {
            secret_key,
            db_user: non_empty_var("DB_USER"),
            db_pass: non_empty_var("DB_PASS"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
