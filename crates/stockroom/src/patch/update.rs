use crate::error::{StockError, StockResult};
use crate::filter::Statement;
use crate::param::{Param, ParamList};
use tokio_postgres::types::{ToSql, Type};

/// Accumulates `column = $n` assignments for one UPDATE.
#[must_use]
#[derive(Debug, Clone)]
pub struct UpdateSet {
    table: &'static str,
    assignments: Vec<&'static str>,
    params: ParamList,
}

impl UpdateSet {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            params: ParamList::new(),
        }
    }

    /// Build from a decoded JSON object, keeping only columns in `allowed`.
    ///
    /// Each allowed column carries its Postgres type; values are converted to
    /// a Rust type that column accepts (`3` becomes an `i32` for `int4`, `9.5`
    /// a `Decimal` for `numeric`). Assignments follow `allowed` order, so the
    /// statement text does not depend on the map's iteration order. Keys
    /// outside `allowed` are dropped without a trace.
    ///
    /// Fails with a bad request naming the column when a value does not fit.
    pub fn from_json_fields(
        table: &'static str,
        fields: &serde_json::Map<String, serde_json::Value>,
        allowed: &[(&'static str, Type)],
    ) -> StockResult<Self> {
        let mut set = Self::new(table);
        for (column, ty) in allowed {
            if let Some(value) = fields.get(*column) {
                let param = Param::from_json_as(value, ty)
                    .ok_or_else(|| StockError::bad_request(format!("Invalid {column}")))?;
                set.set_param(*column, param);
            }
        }
        Ok(set)
    }

    /// Assign `value` to `column`.
    pub fn set<T>(&mut self, column: &'static str, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.set_param(column, Param::new(value))
    }

    pub fn set_param(&mut self, column: &'static str, param: Param) -> &mut Self {
        self.assignments.push(column);
        self.params.push_param(param);
        self
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Columns assigned so far, in order.
    pub fn columns(&self) -> &[&'static str] {
        &self.assignments
    }

    /// Render the UPDATE with `id` bound last for the WHERE clause.
    pub fn finish<I>(self, id_column: &str, id: I) -> StockResult<Statement>
    where
        I: ToSql + Send + Sync + 'static,
    {
        if self.assignments.is_empty() {
            return Err(StockError::NoUpdatableFields);
        }

        let mut sql = format!("UPDATE {} SET ", self.table);
        for (i, column) in self.assignments.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push_str(" = $");
            sql.push_str(&(i + 1).to_string());
        }
        sql.push_str(" WHERE ");
        sql.push_str(id_column);
        sql.push_str(" = ");

        let next_index = self.params.len() + 1;
        let mut stmt = Statement::from_parts(sql, self.params, next_index);
        stmt.push_bind(id);
        Ok(stmt)
    }
}
