use crate::domain::{RequestTemplate, TriggerTarget};
use config::{Config, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const BASE_CONFIG: &str = include_str!("../configuration/base.yaml");
const LOCAL_CONFIG: &str = include_str!("../configuration/local.yaml");
const PRODUCTION_CONFIG: &str = include_str!("../configuration/production.yaml");

/// Environment variable carrying the Travis API token.
pub const API_TOKEN_ENV_VAR: &str = "TRAVIS_API_TOKEN";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub travis: TravisSettings,
    pub repository: RepositorySettings,
    pub request: RequestTemplate,
    pub targets: Vec<TriggerTarget>,
}

#[derive(Debug, Deserialize)]
pub struct TravisSettings {
    pub base_url: String,
    #[serde(default, deserialize_with = "deserialize_optional_secret")]
    api_token: Option<SecretString>,
    pub timeout_seconds: u64,
    pub dry_run: bool,
}

#[derive(Debug, Deserialize)]
pub struct RepositorySettings {
    pub path: PathBuf,
}

/// Returned when the Travis API token is absent or blank.
#[derive(Debug, Error)]
#[error("{API_TOKEN_ENV_VAR} is not set or empty")]
pub struct MissingCredentialError;

fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()).map(SecretString::from))
}

impl TravisSettings {
    /// Returns the API token, failing fast instead of sending an
    /// unauthenticated request.
    pub fn api_token(&self) -> Result<SecretString, MissingCredentialError> {
        match &self.api_token {
            Some(token) if !token.expose_secret().trim().is_empty() => {
                Ok(SecretString::from(token.expose_secret().to_string()))
            }
            _ => Err(MissingCredentialError),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let environment = get_environment()?;
    info!("Using {} configuration", environment.as_str());
    let api_token = std::env::var(API_TOKEN_ENV_VAR).ok();
    build_configuration(environment, api_token)
}

/// `APP_ENVIRONMENT` selects the overlay; unset means `production`, so a
/// token alone is enough to trigger real builds.
fn get_environment() -> Result<Environment, config::ConfigError> {
    let env_var = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "production".to_string());

    env_var
        .try_into()
        .map_err(|e: String| config::ConfigError::Message(e))
}

/// Layers the embedded YAML files, `APP__*` overrides and the API token.
pub fn build_configuration(
    environment: Environment,
    api_token: Option<String>,
) -> Result<Settings, config::ConfigError> {
    let environment_config = match environment {
        Environment::Local => LOCAL_CONFIG,
        Environment::Production => PRODUCTION_CONFIG,
    };

    let settings = Config::builder()
        .add_source(File::from_str(BASE_CONFIG, FileFormat::Yaml))
        .add_source(File::from_str(environment_config, FileFormat::Yaml))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .set_override_option("travis.api_token", api_token)?
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
