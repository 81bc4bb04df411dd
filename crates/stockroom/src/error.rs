//! Error types for stockroom

use crate::validate::ValidationErrors;
use thiserror::Error;

/// Result type alias for stockroom operations
pub type StockResult<T> = Result<T, StockError>;

/// Error types for dispatch, statement construction and storage access
#[derive(Debug, Error)]
pub enum StockError {
    /// An update request carried no field from the entity's allow-list
    #[error("No fields to update")]
    NoUpdatableFields,

    /// No route matched the request
    #[error("handler not found for route: {method} {path}")]
    HandlerNotFound { method: String, path: String },

    /// Malformed route pattern
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Two parameterized patterns can match the same concrete path
    #[error("Overlapping routes: '{first}' and '{second}'")]
    OverlappingRoutes { first: String, second: String },

    /// Malformed request (bad path id, undecodable body)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl StockError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Check if this is a not found error (storage "no rows" or no route)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::HandlerNotFound { .. })
    }

    /// Whether the caller is at fault; such errors never reach storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoUpdatableFields | Self::BadRequest(_) | Self::Validation(_)
        )
    }

    /// HTTP status code the transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoUpdatableFields | Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::HandlerNotFound { .. } | Self::NotFound(_) => 404,
            Self::UniqueViolation(_) | Self::ForeignKeyViolation(_) => 409,
            _ => 500,
        }
    }

    /// Parse a tokio_postgres error into a more specific StockError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<ValidationErrors> for StockError {
    fn from(errs: ValidationErrors) -> Self {
        Self::Validation(errs)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for StockError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
