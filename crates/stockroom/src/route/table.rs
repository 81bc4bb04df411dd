use super::pattern::{PathParams, RoutePattern};
use super::{Method, normalize};
use crate::error::{StockError, StockResult};
use std::collections::HashMap;

/// A resolved route.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub handler: &'a H,
    pub pattern: &'a RoutePattern,
    pub params: PathParams,
}

/// Immutable `(method, pattern) -> handler` table.
///
/// `H` is opaque to the table; it is only stored and handed back.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<(RoutePattern, H)>,
    exact: HashMap<String, usize>,
}

impl<H> RouteTable<H> {
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder { routes: Vec::new() }
    }

    /// Resolve a request.
    ///
    /// The method is matched case-insensitively; one leading `/` on the path
    /// is ignored. Fails with [`StockError::HandlerNotFound`].
    pub fn resolve(&self, method: &str, path: &str) -> StockResult<RouteMatch<'_, H>> {
        let path = normalize(path);
        let not_found = || StockError::HandlerNotFound {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
        };
        let method: Method = method.parse().map_err(|_| not_found())?;

        let key = format!("{method} {path}");
        if let Some(&idx) = self.exact.get(&key) {
            let (pattern, handler) = &self.routes[idx];
            return Ok(RouteMatch {
                handler,
                pattern,
                params: PathParams::default(),
            });
        }

        let parts: Vec<&str> = path.split('/').collect();
        self.routes
            .iter()
            .filter(|(pattern, _)| !pattern.is_literal())
            .find_map(|(pattern, handler)| {
                pattern.capture(method, &parts).map(|params| RouteMatch {
                    handler,
                    pattern,
                    params,
                })
            })
            .ok_or_else(not_found)
    }

    /// Registered routes, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RoutePattern, &H)> {
        self.routes.iter().map(|(p, h)| (p, h))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects routes and validates them as they are added.
#[must_use]
pub struct RouteTableBuilder<H> {
    routes: Vec<(RoutePattern, H)>,
}

impl<H> RouteTableBuilder<H> {
    /// Register `path` for `method`.
    ///
    /// Rejects malformed patterns, duplicate keys, and a parameterized
    /// pattern that overlaps an already registered parameterized pattern.
    pub fn route(mut self, method: Method, path: &str, handler: H) -> StockResult<Self> {
        let pattern = RoutePattern::parse(method, path)?;
        for (existing, _) in &self.routes {
            let duplicate = existing.key() == pattern.key();
            let ambiguous =
                !existing.is_literal() && !pattern.is_literal() && existing.overlaps(&pattern);
            if duplicate || ambiguous {
                return Err(StockError::OverlappingRoutes {
                    first: existing.key(),
                    second: pattern.key(),
                });
            }
        }
        self.routes.push((pattern, handler));
        Ok(self)
    }

    pub fn build(self) -> RouteTable<H> {
        let exact = self
            .routes
            .iter()
            .enumerate()
            .filter(|(_, (pattern, _))| pattern.is_literal())
            .map(|(idx, (pattern, _))| (pattern.key(), idx))
            .collect();
        RouteTable {
            routes: self.routes,
            exact,
        }
    }
}
