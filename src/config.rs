//! Client configuration.
//!
//! [`ClientConfig`] holds everything that is fixed for the lifetime of a
//! client. It can be filled in by hand, through
//! [`OdeskClientBuilder`](crate::client::OdeskClientBuilder), or from the
//! environment with [`ClientConfig::from_env`].

use std::env;
use std::time::Duration;

use crate::auth::{AccessToken, AuthMode};
use crate::error::{OdeskError, OdeskResult};
use crate::http::{ResponseFormat, DEFAULT_TIMEOUT_SECS};
use crate::namespace::Namespaces;
use crate::network::DEFAULT_BASE_URL;

pub const ENV_PUBLIC_KEY: &str = "ODESK_PUBLIC_KEY";
pub const ENV_SECRET_KEY: &str = "ODESK_SECRET_KEY";
pub const ENV_API_TOKEN: &str = "ODESK_API_TOKEN";
pub const ENV_ACCESS_TOKEN: &str = "ODESK_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "ODESK_ACCESS_TOKEN_SECRET";
pub const ENV_AUTH: &str = "ODESK_AUTH";
pub const ENV_PARAMS_IN_HEADERS: &str = "ODESK_PARAMS_IN_HEADERS";
pub const ENV_BASE_URL: &str = "ODESK_BASE_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub public_key: String,
    pub secret_key: String,
    pub api_token: Option<String>,
    pub auth: AuthMode,
    /// Required when `auth` is [`AuthMode::Delegated`]
    pub access_token: Option<AccessToken>,
    /// Only affects delegated auth
    pub params_in_headers: bool,
    pub format: ResponseFormat,
    pub base_url: String,
    pub timeout: Duration,
    pub namespaces: Namespaces,
}

impl ClientConfig {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            api_token: None,
            auth: AuthMode::Simple,
            access_token: None,
            params_in_headers: false,
            format: ResponseFormat::Json,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            namespaces: Namespaces::all(),
        }
    }

    /// Read configuration from `ODESK_*` environment variables.
    ///
    /// `ODESK_PUBLIC_KEY` and `ODESK_SECRET_KEY` are required.
    pub fn from_env() -> OdeskResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OdeskResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| OdeskError::Config(format!("{} must be set", key)))
        };

        let mut config = Self::new(required(ENV_PUBLIC_KEY)?, required(ENV_SECRET_KEY)?);
        config.api_token = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty());

        if let Some(mode) = lookup(ENV_AUTH) {
            config.auth = mode.parse()?;
        }
        let token = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty());
        let secret = lookup(ENV_ACCESS_TOKEN_SECRET).filter(|v| !v.is_empty());
        config.access_token = match (token, secret) {
            (Some(token), Some(secret)) => Some(AccessToken::new(token, secret)),
            (None, None) => None,
            (Some(_), None) => return Err(half_pair(ENV_ACCESS_TOKEN, ENV_ACCESS_TOKEN_SECRET)),
            (None, Some(_)) => return Err(half_pair(ENV_ACCESS_TOKEN_SECRET, ENV_ACCESS_TOKEN)),
        };
        if let Some(flag) = lookup(ENV_PARAMS_IN_HEADERS) {
            config.params_in_headers = parse_flag(ENV_PARAMS_IN_HEADERS, &flag)?;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }

        Ok(config)
    }

    /// Check that the configuration can produce a working client.
    pub fn validate(&self) -> OdeskResult<()> {
        self.validate_endpoint()?;
        if self.auth == AuthMode::Delegated && self.access_token.is_none() {
            return Err(OdeskError::Config(
                "delegated auth requires an access token and access token secret".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks that hold whichever auth strategy ends up signing requests.
    pub fn validate_endpoint(&self) -> OdeskResult<()> {
        if self.public_key.is_empty() {
            return Err(OdeskError::Config("public key must not be empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(OdeskError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn half_pair(set: &str, missing: &str) -> OdeskError {
    OdeskError::Config(format!("{} is set but {} is missing", set, missing))
}

fn parse_flag(key: &str, value: &str) -> OdeskResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(OdeskError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
