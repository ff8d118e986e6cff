//! `reqwest`-backed `PostgREST` RPC client.
//!
//! Every call is a `POST` of the named parameters as a JSON object. The
//! project key is sent both as `apikey` and as a bearer token, which is
//! what Supabase expects for anonymous access.

use serde::Deserialize;

use crate::{RpcClient, SupabaseConfig, SupabaseError};

/// Remote procedure client for a single Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Creates a client with a fresh connection pool.
    #[must_use]
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Creates a client that shares an existing `reqwest` connection pool.
    #[must_use]
    pub const fn with_http_client(http: reqwest::Client, config: SupabaseConfig) -> Self {
        Self { http, config }
    }

    #[must_use]
    pub const fn config(&self) -> &SupabaseConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl RpcClient for SupabaseClient {
    async fn call(
        &self,
        function: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, SupabaseError> {
        let url = self.config.rpc_url(function);
        log::debug!("Calling remote procedure {function}");

        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .json(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(api_error(function, status.as_u16(), &body));
        }

        parse_body(&body)
    }
}

/// Error payload returned by `PostgREST`.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Builds an [`SupabaseError::Api`] from a failed response body.
///
/// Falls back to the raw body when it is not a `PostgREST` error object.
fn api_error(function: &str, status: u16, body: &str) -> SupabaseError {
    let (message, code) = match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(err) => {
            let mut message = err.message.unwrap_or_else(|| "unknown error".to_string());
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message.push_str(" (");
                message.push_str(&details);
                message.push(')');
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                message.push_str("; hint: ");
                message.push_str(&hint);
            }
            (message, err.code)
        }
        Err(_) => (body.trim().to_string(), None),
    };

    SupabaseError::Api {
        function: function.to_string(),
        status,
        message,
        code,
    }
}

/// Parses a successful response body.
///
/// Functions returning `void` answer with an empty body, which reads as
/// `null`.
fn parse_body(body: &str) -> Result<serde_json::Value, SupabaseError> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}
