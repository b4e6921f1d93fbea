// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and is immutable afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Identity provider domain | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH0_JWKS_URL` | JWKS endpoint override | `https://<domain>/.well-known/jwks.json` |
//! | `JWKS_TIMEOUT_SECS` | Timeout for one JWKS fetch | `10` |
//! | `JWKS_CACHE_TTL_SECS` | Key set cache TTL (`0` or unset disables caching) | unset |
//! | `JWKS_MAX_STALE_SECS` | Oldest cached key set served while the endpoint fails | `3600` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const JWKS_URL_ENV: &str = "AUTH0_JWKS_URL";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_MAX_STALE_ENV: &str = "JWKS_MAX_STALE_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Default timeout for a single JWKS fetch (10 seconds).
pub const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(10);

/// Default age after which a cached key set is no longer served when
/// refreshes keep failing (1 hour).
pub const DEFAULT_JWKS_MAX_STALE: Duration = Duration::from_secs(3600);

/// The only signing algorithm accepted. Never taken from the token.
pub const ACCEPTED_ALGORITHM: Algorithm = Algorithm::RS256;

/// Configuration errors. Only raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Settings for token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Identity provider domain, e.g. `dev-shop.us.auth0.com`
    pub domain: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Where the provider publishes its key set
    pub jwks_url: Url,
    /// Upper bound for one key set fetch
    pub jwks_timeout: Duration,
    /// Key set cache TTL; `None` fetches on every check
    pub jwks_cache_ttl: Option<Duration>,
    /// Age at which a cached key set stops being served during an outage
    pub jwks_max_stale: Duration,
}

impl AuthSettings {
    /// Build settings for `domain`, deriving the standard JWKS location.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        if domain.is_empty() {
            return Err(ConfigError::Missing(AUTH0_DOMAIN_ENV));
        }
        let jwks_url = parse_url(
            JWKS_URL_ENV,
            &format!("https://{domain}/.well-known/jwks.json"),
        )?;

        Ok(Self {
            domain,
            audience: audience.into(),
            jwks_url,
            jwks_timeout: DEFAULT_JWKS_TIMEOUT,
            jwks_cache_ttl: None,
            jwks_max_stale: DEFAULT_JWKS_MAX_STALE,
        })
    }

    /// Override the JWKS location.
    pub fn with_jwks_url(mut self, url: Url) -> Self {
        self.jwks_url = url;
        self
    }

    /// Set the fetch timeout.
    pub fn with_jwks_timeout(mut self, timeout: Duration) -> Self {
        self.jwks_timeout = timeout;
        self
    }

    /// Enable the key set cache.
    pub fn with_jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = Some(ttl);
        self
    }

    /// Bound how long a cached key set survives failed refreshes.
    pub fn with_jwks_max_stale(mut self, max_stale: Duration) -> Self {
        self.jwks_max_stale = max_stale;
        self
    }

    /// Load settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let domain = lookup(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let audience = lookup(API_AUDIENCE_ENV).ok_or(ConfigError::Missing(API_AUDIENCE_ENV))?;

        let mut settings = Self::new(domain, audience)?;

        if let Some(url) = lookup(JWKS_URL_ENV) {
            settings.jwks_url = parse_url(JWKS_URL_ENV, &url)?;
        }
        if let Some(secs) = lookup(JWKS_TIMEOUT_ENV) {
            settings.jwks_timeout = Duration::from_secs(parse_secs(JWKS_TIMEOUT_ENV, &secs)?);
        }
        if let Some(secs) = lookup(JWKS_CACHE_TTL_ENV) {
            settings.jwks_cache_ttl = match parse_secs(JWKS_CACHE_TTL_ENV, &secs)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
        }
        if let Some(secs) = lookup(JWKS_MAX_STALE_ENV) {
            settings.jwks_max_stale = Duration::from_secs(parse_secs(JWKS_MAX_STALE_ENV, &secs)?);
        }

        Ok(settings)
    }

    /// Expected `iss` claim: `https://<domain>/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }
}

/// Server bind address from `host` and `port`.
pub fn bind_address(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    format!("{host}:{port}")
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: HOST_ENV,
            reason: e.to_string(),
        })
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("expected whole seconds, got {value:?}"),
    })
}
