//! Transport-neutral request context.

use crate::error::{StockError, StockResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::str::FromStr;

/// One inbound call: method, path relative to the module mount point,
/// decoded query string and decoded JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Query value, trimmed; blank values read as absent.
    pub fn query_str(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Parse a query value. Absent or blank is `Ok(None)`; anything that
    /// does not parse is a bad request naming the key.
    pub fn query_parse<T: FromStr>(&self, key: &str) -> StockResult<Option<T>> {
        self.query_str(key)
            .map(|v| {
                v.parse()
                    .map_err(|_| StockError::bad_request(format!("Invalid {key}")))
            })
            .transpose()
    }

    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> StockResult<T> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| StockError::bad_request("Invalid request body"))?;
        serde_json::from_value(body.clone())
            .map_err(|_| StockError::bad_request("Invalid request body"))
    }
}
