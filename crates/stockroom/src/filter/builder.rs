use super::blank::Blank;
use super::statement::Statement;
use super::{MARKER, max_placeholder};
use crate::param::{Param, ParamList};
use std::fmt::Write as _;
use tokio_postgres::types::ToSql;

/// A base statement plus AND-joined conditions.
///
/// Created per request, consumed by [`FilterQuery::build`].
#[must_use]
#[derive(Debug, Clone)]
pub struct FilterQuery {
    base: String,
    conditions: Vec<String>,
    params: ParamList,
    next_index: usize,
}

impl FilterQuery {
    /// Start from `base`. Numbering continues after the highest `$n` the base
    /// already uses, so a base without placeholders starts at `$1`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let next_index = max_placeholder(&base) + 1;
        Self {
            base,
            conditions: Vec::new(),
            params: ParamList::new(),
            next_index,
        }
    }

    /// Start from a base whose own placeholders are bound by `args`.
    pub fn with_args(base: impl Into<String>, args: ParamList) -> Self {
        let mut q = Self::new(base);
        debug_assert_eq!(
            args.len() + 1,
            q.next_index,
            "base statement placeholders must match its arguments"
        );
        q.params = args;
        q
    }

    /// Append `template` as an AND-joined condition.
    ///
    /// Every `$?` in the template gets its own index and its own copy of
    /// `value`, left to right. A template without markers binds nothing.
    pub fn and_where<T>(&mut self, template: &str, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        let param = Param::new(value);
        let condition = self.substitute(template, &param);
        self.conditions.push(condition);
        self
    }

    /// Like [`and_where`](Self::and_where), but the whole condition is dropped
    /// when `value` is [blank](Blank). A dropped condition consumes no index.
    pub fn and_where_opt<T>(&mut self, template: &str, value: T) -> &mut Self
    where
        T: ToSql + Blank + Send + Sync + 'static,
    {
        if value.is_blank() {
            return self;
        }
        self.and_where(template, value)
    }

    /// Number of accepted conditions.
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// The index the next marker would receive.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Render the statement: base text, then ` AND <condition>` per accepted
    /// condition, with arguments in bind order.
    pub fn build(self) -> Statement {
        let cap = self.base.len() + self.conditions.iter().map(|c| c.len() + 5).sum::<usize>();
        let mut sql = String::with_capacity(cap);
        sql.push_str(&self.base);
        for condition in &self.conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }
        Statement::from_parts(sql, self.params, self.next_index)
    }

    fn substitute(&mut self, template: &str, param: &Param) -> String {
        let mut out = String::with_capacity(template.len() + 4);
        let mut rest = template;
        while let Some(pos) = rest.find(MARKER) {
            out.push_str(&rest[..pos]);
            let _ = write!(out, "${}", self.next_index);
            self.params.push_param(param.clone());
            self.next_index += 1;
            rest = &rest[pos + MARKER.len()..];
        }
        out.push_str(rest);
        out
    }
}
