#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Supabase remote procedure call client.
//!
//! Supabase exposes Postgres functions through `PostgREST` at
//! `{project}/rest/v1/rpc/{function}`. The [`RpcClient`] trait is the seam
//! the rest of the workspace talks to; [`client::SupabaseClient`] is the
//! `reqwest`-backed implementation. The client is always constructed
//! explicitly from a [`SupabaseConfig`] and passed to its consumers.

pub mod client;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use client::SupabaseClient;

/// Errors that can occur while calling a remote procedure.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("Remote procedure '{function}' failed with status {status}: {message}")]
    Api {
        /// Name of the remote procedure.
        function: String,
        /// HTTP status code.
        status: u16,
        /// Error message reported by the backend.
        message: String,
        /// `PostgREST` / Postgres error code, if reported.
        code: Option<String>,
    },

    /// Client configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what is missing.
        message: String,
    },
}

/// Connection settings for a Supabase project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://abc.supabase.co`).
    pub url: String,
    /// Anonymous (publishable) API key.
    pub key: String,
}

impl SupabaseConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Reads the configuration from `SUPABASE_URL` and `SUPABASE_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Config`] if either variable is unset or
    /// empty.
    pub fn from_env() -> Result<Self, SupabaseError> {
        let url = read_env("SUPABASE_URL")?;
        let key = read_env("SUPABASE_KEY")?;
        Ok(Self { url, key })
    }

    /// Full URL of a remote procedure.
    #[must_use]
    pub fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{function}", self.url.trim_end_matches('/'))
    }
}

fn read_env(name: &str) -> Result<String, SupabaseError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SupabaseError::Config {
            message: format!("{name} environment variable not set"),
        })
}

/// A client able to invoke remote procedures.
#[async_trait::async_trait]
pub trait RpcClient: Send + Sync {
    /// Invokes `function` with named `params` and returns the raw JSON
    /// response body.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] if the request fails or the backend
    /// reports an error.
    async fn call(
        &self,
        function: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, SupabaseError>;
}

/// Invokes a remote procedure and decodes its response into `T`.
///
/// # Errors
///
/// Returns [`SupabaseError`] if the call fails or the response does not
/// match `T`.
pub async fn rpc<T: DeserializeOwned>(
    client: &dyn RpcClient,
    function: &str,
    params: serde_json::Value,
) -> Result<T, SupabaseError> {
    let body = client.call(function, params).await?;
    Ok(serde_json::from_value(body)?)
}
