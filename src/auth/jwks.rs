// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and key selection.
//!
//! ## Behaviour
//!
//! - The key set is fetched from a fixed, configured URL
//! - Every fetch is bounded by the configured timeout
//! - Without a cache TTL, every check fetches the key set again
//! - With a cache TTL:
//!   - fresh entries are served without network access
//!   - concurrent refreshes collapse into one in-flight fetch
//!   - a failed refresh keeps (and serves) the previous entry, until it is
//!     older than the configured maximum staleness
//!
//! Fetch failures and unknown key ids both surface as
//! [`AuthError::KeyNotFound`]; the difference is only visible in logs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::decode_header;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, PublicKeyUse};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use url::Url;

use super::{AuthError, BearerToken};
use crate::config::{AuthSettings, ConfigError, DEFAULT_JWKS_MAX_STALE};

/// Public key used to verify token signatures.
///
/// Projection of a key set entry onto the fields needed for verification;
/// any other provider metadata is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub key_id: String,
    pub key_type: String,
    pub usage: Option<String>,
    /// Base64url-encoded RSA modulus
    pub modulus: String,
    /// Base64url-encoded RSA public exponent
    pub exponent: String,
}

/// Key set document as published by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct KeySet(JwkSet);

impl KeySet {
    /// Find the key with the given id.
    ///
    /// Only RSA entries can verify RS256 tokens; anything else is skipped.
    pub fn find(&self, kid: &str) -> Option<SigningKey> {
        self.0
            .keys
            .iter()
            .filter(|jwk| jwk.common.key_id.as_deref() == Some(kid))
            .find_map(|jwk| to_signing_key(kid, jwk))
    }

    pub fn len(&self) -> usize {
        self.0.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.keys.is_empty()
    }
}

/// Project an RSA JWK onto [`SigningKey`].
fn to_signing_key(kid: &str, jwk: &Jwk) -> Option<SigningKey> {
    let AlgorithmParameters::RSA(rsa) = &jwk.algorithm else {
        return None;
    };

    let usage = jwk.common.public_key_use.as_ref().map(|usage| match usage {
        PublicKeyUse::Signature => "sig".to_string(),
        PublicKeyUse::Encryption => "enc".to_string(),
        PublicKeyUse::Other(other) => other.clone(),
    });

    Some(SigningKey {
        key_id: kid.to_string(),
        key_type: "RSA".to_string(),
        usage,
        modulus: rsa.n.clone(),
        exponent: rsa.e.clone(),
    })
}

/// Why a key set fetch failed. Logged, then folded into `KeyNotFound`.
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("HTTP {0} from JWKS endpoint")]
    Status(reqwest::StatusCode),
    #[error("invalid key set document: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Cached key set.
struct CacheEntry {
    keys: Arc<KeySet>,
    fetched_at: Instant,
}

struct KeySetCache {
    ttl: Duration,
    /// Oldest entry still served when a refresh fails
    max_stale: Duration,
    entry: RwLock<Option<CacheEntry>>,
    /// Held by the one caller currently refreshing.
    refresh: Mutex<()>,
}

impl KeySetCache {
    fn new(ttl: Duration, max_stale: Duration) -> Self {
        Self {
            ttl,
            max_stale,
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    async fn fresh(&self) -> Option<Arc<KeySet>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.keys.clone())
    }

    /// Entry past its TTL but within the staleness bound.
    async fn stale(&self) -> Option<Arc<KeySet>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.fetched_at.elapsed() < self.max_stale)
            .map(|e| e.keys.clone())
    }

    async fn store(&self, keys: Arc<KeySet>) {
        *self.entry.write().await = Some(CacheEntry {
            keys,
            fetched_at: Instant::now(),
        });
    }
}

/// Resolves the signing key for a token from the provider's key set.
pub struct KeySetResolver {
    jwks_url: Url,
    timeout: Duration,
    client: reqwest::Client,
    cache: Option<KeySetCache>,
}

impl KeySetResolver {
    /// Create a resolver without caching.
    ///
    /// # Arguments
    /// - `jwks_url`: the key set endpoint (e.g. `https://<domain>/.well-known/jwks.json`)
    /// - `timeout`: upper bound for one fetch, connect to last byte
    pub fn new(jwks_url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            jwks_url,
            timeout,
            client,
            cache: None,
        })
    }

    /// Build from settings, enabling the cache when a TTL is configured.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, ConfigError> {
        let resolver = Self::new(settings.jwks_url.clone(), settings.jwks_timeout)?;
        Ok(match settings.jwks_cache_ttl {
            Some(ttl) => resolver
                .with_cache_ttl(ttl)
                .with_max_stale(settings.jwks_max_stale),
            None => resolver,
        })
    }

    /// Cache key sets for `ttl`.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        let max_stale = self
            .cache
            .as_ref()
            .map_or(DEFAULT_JWKS_MAX_STALE, |cache| cache.max_stale);
        self.cache = Some(KeySetCache::new(ttl, max_stale));
        self
    }

    /// Stop serving a cached key set once it is older than `max_stale`,
    /// even when the endpoint cannot be reached. No effect without a cache.
    pub fn with_max_stale(mut self, max_stale: Duration) -> Self {
        if let Some(cache) = self.cache.as_mut() {
            cache.max_stale = max_stale;
        }
        self
    }

    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    /// Resolve the key that signed `token`.
    ///
    /// Reads `kid` from the unverified token header; nothing about the
    /// token is trusted at this point.
    pub async fn resolve(&self, token: &BearerToken) -> Result<SigningKey, AuthError> {
        let header = decode_header(token.as_str()).map_err(|e| {
            tracing::debug!(error = %e, "Unable to decode token header");
            AuthError::InvalidHeader
        })?;

        let kid = header.kid.ok_or(AuthError::InvalidHeader)?;
        let keys = self.key_set().await?;

        keys.find(&kid).ok_or_else(|| {
            tracing::debug!(kid = %kid, "No matching key in JWKS");
            AuthError::KeyNotFound
        })
    }

    /// Get the current key set, from cache when possible.
    pub async fn key_set(&self) -> Result<Arc<KeySet>, AuthError> {
        let Some(cache) = &self.cache else {
            return self.fetch_jwks().await.map(Arc::new).map_err(|e| {
                tracing::warn!(error = %e, url = %self.jwks_url, "Failed to fetch JWKS");
                AuthError::KeyNotFound
            });
        };

        if let Some(keys) = cache.fresh().await {
            return Ok(keys);
        }

        // Wait for an in-flight refresh, but never longer than a fetch may take.
        let Ok(_guard) = tokio::time::timeout(self.timeout, cache.refresh.lock()).await else {
            tracing::warn!(url = %self.jwks_url, "Timed out waiting for JWKS refresh");
            return cache.stale().await.ok_or(AuthError::KeyNotFound);
        };

        // Another caller may have refreshed while we waited.
        if let Some(keys) = cache.fresh().await {
            return Ok(keys);
        }

        self.refresh_locked(cache).await
    }

    /// Force a fetch. With a cache, the result replaces the cached entry.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        match &self.cache {
            Some(cache) => {
                let _guard = tokio::time::timeout(self.timeout, cache.refresh.lock())
                    .await
                    .map_err(|_| AuthError::KeyNotFound)?;
                let keys = self.fetch_jwks().await.map_err(|e| {
                    tracing::warn!(error = %e, url = %self.jwks_url, "Failed to refresh JWKS");
                    AuthError::KeyNotFound
                })?;
                cache.store(Arc::new(keys)).await;
                Ok(())
            }
            None => self.key_set().await.map(|_| ()),
        }
    }

    /// Check if a fresh key set is cached.
    pub async fn is_cached(&self) -> bool {
        match &self.cache {
            Some(cache) => cache.fresh().await.is_some(),
            None => false,
        }
    }

    /// Fetch and store while holding the refresh lock.
    async fn refresh_locked(&self, cache: &KeySetCache) -> Result<Arc<KeySet>, AuthError> {
        match self.fetch_jwks().await {
            Ok(keys) => {
                let keys = Arc::new(keys);
                cache.store(keys.clone()).await;
                tracing::debug!(keys = keys.len(), "JWKS refreshed");
                Ok(keys)
            }
            Err(e) => match cache.stale().await {
                Some(stale) => {
                    tracing::warn!(error = %e, url = %self.jwks_url, "JWKS refresh failed, serving stale key set");
                    Ok(stale)
                }
                None => {
                    tracing::warn!(error = %e, url = %self.jwks_url, "Failed to fetch JWKS");
                    Err(AuthError::KeyNotFound)
                }
            },
        }
    }

    /// Fetch the key set from the endpoint.
    async fn fetch_jwks(&self) -> Result<KeySet, FetchError> {
        let response = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(FetchError::Request)?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        response.json::<KeySet>().await.map_err(FetchError::Decode)
    }
}
