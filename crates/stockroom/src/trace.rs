//! SQL tracing around any [`GenericClient`].

use crate::client::GenericClient;
use crate::error::StockResult;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Emits every statement (before it runs) as a `tracing` event under target
/// `stockroom.sql`, then delegates to the wrapped client.
#[derive(Debug, Clone)]
pub struct TracedClient<C> {
    inner: C,
    /// Tracing event level to emit at.
    level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    max_sql_length: Option<usize>,
}

impl<C> TracedClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }

    fn emit(&self, sql: &str, param_count: usize) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "stockroom.sql",
            param_count,
            sql = %sql,
        );
    }
}

impl<C: GenericClient> GenericClient for TracedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StockResult<Vec<Row>> {
        self.emit(sql, params.len());
        self.inner.query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StockResult<u64> {
        self.emit(sql, params.len());
        self.inner.execute(sql, params).await
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
