//! In-memory [`RpcClient`] returning canned responses.
//!
//! Records every call so tests can assert on the function names and
//! parameters that were sent.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::{RpcClient, SupabaseError};

#[derive(Debug, Clone)]
enum Canned {
    Ok(serde_json::Value),
    Fail { status: u16, message: String },
}

/// Canned-response remote procedure client.
#[derive(Debug, Default)]
pub struct StaticRpc {
    responses: BTreeMap<String, Canned>,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl StaticRpc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers calls to `function` with `body`.
    #[must_use]
    pub fn with_response(mut self, function: &str, body: serde_json::Value) -> Self {
        self.responses
            .insert(function.to_string(), Canned::Ok(body));
        self
    }

    /// Answers calls to `function` with an API error.
    #[must_use]
    pub fn with_failure(mut self, function: &str, status: u16, message: &str) -> Self {
        self.responses.insert(
            function.to_string(),
            Canned::Fail {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made to `function`.
    #[must_use]
    pub fn call_count(&self, function: &str) -> usize {
        self.calls().iter().filter(|(f, _)| f == function).count()
    }
}

#[async_trait::async_trait]
impl RpcClient for StaticRpc {
    async fn call(
        &self,
        function: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, SupabaseError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((function.to_string(), params));

        match self.responses.get(function) {
            Some(Canned::Ok(body)) => Ok(body.clone()),
            Some(Canned::Fail { status, message }) => Err(SupabaseError::Api {
                function: function.to_string(),
                status: *status,
                message: message.clone(),
                code: None,
            }),
            None => Err(SupabaseError::Api {
                function: function.to_string(),
                status: 404,
                message: format!("Could not find the function public.{function}"),
                code: Some("PGRST202".to_string()),
            }),
        }
    }
}
