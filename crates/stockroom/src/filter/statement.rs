use super::max_placeholder;
use crate::client::GenericClient;
use crate::error::StockResult;
use crate::param::ParamList;
use crate::row::FromRow;
use std::fmt::Write as _;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A rendered SQL string plus its arguments in `$n` order.
///
/// Produced by [`FilterQuery::build`](super::FilterQuery::build) and
/// [`UpdateSet::finish`](crate::patch::UpdateSet::finish), or written by hand
/// for fixed statements with [`Statement::new`] and [`Statement::bind`].
#[must_use]
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    params: ParamList,
    next_index: usize,
}

impl Statement {
    /// A pre-numbered statement (`$1, $2, ...`); bind its values in order.
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let next_index = max_placeholder(&sql) + 1;
        Self {
            sql,
            params: ParamList::new(),
            next_index,
        }
    }

    pub(crate) fn from_parts(sql: String, params: ParamList, next_index: usize) -> Self {
        debug_assert!(params.len() < next_index);
        Self {
            sql,
            params,
            next_index,
        }
    }

    /// Bind the value for the next pre-numbered placeholder.
    ///
    /// The SQL text is left untouched.
    pub fn bind<T>(mut self, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(value);
        self
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append the next `$n` and bind its value.
    pub fn push_bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let _ = write!(self.sql, "${}", self.next_index);
        self.next_index += 1;
        self.params.push(value);
        self
    }

    /// Append `LIMIT $n OFFSET $m` with bound values.
    pub fn limit_offset(&mut self, limit: i64, offset: i64) -> &mut Self {
        self.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset)
    }

    /// Access the SQL string.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound arguments, in placeholder order.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    pub fn into_parts(self) -> (String, ParamList) {
        (self.sql, self.params)
    }

    // ==================== Execution ====================

    /// Execute the statement and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> StockResult<Vec<Row>> {
        let params = self.params.as_refs();
        conn.query(&self.sql, &params).await
    }

    /// Execute the statement and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> StockResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the statement and return the first row mapped to `T`.
    ///
    /// Zero rows is [`StockError::NotFound`](crate::StockError::NotFound).
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> StockResult<T> {
        let params = self.params.as_refs();
        let row = conn.query_one(&self.sql, &params).await?;
        T::from_row(&row)
    }

    /// Execute the statement and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> StockResult<Option<T>> {
        let params = self.params.as_refs();
        let row = conn.query_opt(&self.sql, &params).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the statement and return the number of affected rows.
    pub async fn execute(&self, conn: &impl GenericClient) -> StockResult<u64> {
        let params = self.params.as_refs();
        conn.execute(&self.sql, &params).await
    }
}
