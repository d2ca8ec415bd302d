use std::{env, fmt, str::FromStr};

use thiserror::Error;
use tube_auth_core::{Credentials, ProviderEndpoints};

/// Deployment environment, drives log format and HSTS
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ENVIRONMENT must be 'development' or 'production', got '{0}'")]
    InvalidEnvironment(String),
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

#[derive(Clone)]
pub struct ApiConfig {
    pub client_id: String,
    pub client_secret: String,
    pub env: Environment,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Option<String>,
    pub auth_endpoint: String,
    pub token_endpoint: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("env", &self.env)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("auth_endpoint", &self.auth_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Missing client credentials are not an error: they are passed to the
    /// provider as empty strings and the provider rejects the request.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup("CLIENT_ID").unwrap_or_default();
        let client_secret = lookup("CLIENT_SECRET").unwrap_or_default();

        let env = lookup("ENVIRONMENT")
            .map(|v| v.parse::<Environment>())
            .transpose()?
            .unwrap_or_default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        let google = ProviderEndpoints::google();

        Ok(Self {
            client_id,
            client_secret,
            env,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            allowed_origins: lookup("ALLOWED_ORIGINS").filter(|v| !v.trim().is_empty()),
            auth_endpoint: lookup("AUTH_ENDPOINT").unwrap_or(google.auth_url),
            token_endpoint: lookup("TOKEN_ENDPOINT").unwrap_or(google.token_url),
        })
    }

    /// Names of the credential variables that are unset or empty
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("CLIENT_ID", &self.client_id),
            ("CLIENT_SECRET", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }

    pub fn endpoints(&self) -> ProviderEndpoints {
        ProviderEndpoints {
            auth_url: self.auth_endpoint.clone(),
            token_url: self.token_endpoint.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Comma separated `ALLOWED_ORIGINS`, empty when CORS should stay permissive
    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
