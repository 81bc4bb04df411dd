//! Response envelope.

use crate::error::StockError;
use serde::Serialize;
use serde_json::{Value, json};

/// Status code plus `{"success": …}` JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    /// 200 with `data`.
    pub fn ok<T: Serialize>(data: T) -> Self {
        Self::success(200, data)
    }

    /// 201 with `data`.
    pub fn created<T: Serialize>(data: T) -> Self {
        Self::success(201, data)
    }

    /// 200 with `{"<key>": [...], "count": n}` as data.
    pub fn list<T: Serialize>(key: &str, items: &[T]) -> Self {
        match serde_json::to_value(items) {
            Ok(encoded) => {
                let mut data = serde_json::Map::new();
                data.insert(key.to_string(), encoded);
                data.insert("count".to_string(), json!(items.len()));
                Self::ok(data)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response");
                Self::error(500, "Failed to encode response")
            }
        }
    }

    /// 200 with `{"message": …}` as data.
    pub fn message(message: &str) -> Self {
        Self::ok(json!({ "message": message }))
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "success": false, "error": message.into() }),
        }
    }

    /// Map `err` onto the envelope.
    ///
    /// Caller and lookup failures carry their own message; server-side
    /// failures are reported as `failure` so storage details stay internal.
    pub fn from_error(err: &StockError, failure: &str) -> Self {
        let status = err.status_code();
        let message = match err {
            StockError::BadRequest(msg) | StockError::NotFound(msg) => msg.clone(),
            StockError::Validation(errs) => errs.to_string(),
            StockError::UniqueViolation(_) | StockError::ForeignKeyViolation(_) => {
                format!("{failure}: conflicting record")
            }
            _ if status < 500 => err.to_string(),
            _ => failure.to_string(),
        };
        Self::error(status, message)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn success<T: Serialize>(status: u16, data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status,
                body: json!({ "success": true, "data": data }),
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response");
                Self::error(500, "Failed to encode response")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{ValidationError, ValidationErrors};

    #[test]
    fn success_envelope() {
        let reply = Reply::created(json!({"id": 3}));
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body, json!({"success": true, "data": {"id": 3}}));
        assert!(reply.is_success());
    }

    #[test]
    fn list_is_keyed_with_count() {
        let reply = Reply::list("categories", &[json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.body,
            json!({
                "success": true,
                "data": {"categories": [{"id": 1}, {"id": 2}], "count": 2}
            })
        );

        let empty: [Value; 0] = [];
        let reply = Reply::list("stock_levels", &empty);
        assert_eq!(reply.body["data"], json!({"stock_levels": [], "count": 0}));
    }

    #[test]
    fn client_errors_keep_their_message() {
        let reply = Reply::from_error(&StockError::NoUpdatableFields, "Failed to update product");
        assert_eq!(reply.status, 400);
        assert_eq!(
            reply.body,
            json!({"success": false, "error": "No fields to update"})
        );

        let mut errs = ValidationErrors::default();
        errs.push(ValidationError::required("sku"));
        let reply = Reply::from_error(&StockError::Validation(errs), "Failed to create product");
        assert_eq!(reply.body["error"], "sku is required");

        let reply = Reply::from_error(&StockError::not_found("Product not found"), "x");
        assert_eq!(reply.status, 404);
        assert_eq!(reply.body["error"], "Product not found");
    }

    #[test]
    fn server_errors_are_masked() {
        let err = StockError::Other("connection reset by peer".into());
        let reply = Reply::from_error(&err, "Failed to fetch products");
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body["error"], "Failed to fetch products");
        assert!(!reply.is_success());
    }

    #[test]
    fn constraint_violations_are_conflicts() {
        let err = StockError::UniqueViolation("products_sku_key: duplicate key".into());
        let reply = Reply::from_error(&err, "Failed to create product");
        assert_eq!(reply.status, 409);
        assert_eq!(reply.body["error"], "Failed to create product: conflicting record");
    }
}
