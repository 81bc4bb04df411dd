//! Resolve `(method, path)` to a handler.
//!
//! Patterns are written `"/products/{id}"`: each segment is either a literal
//! or a `{name}` parameter that matches any non-empty request segment.
//! Resolution tries an exact lookup among literal patterns first, then scans
//! parameterized patterns in registration order.
//!
//! The table refuses, at construction time, any pair of parameterized
//! patterns that could both match one concrete path, so the scan order never
//! decides which handler runs. A literal pattern may shadow a parameterized
//! one (`/products/featured` next to `/products/{id}`): the exact lookup
//! always wins.

mod method;
mod pattern;
mod table;


pub use method::Method;
pub use pattern::{PathParams, RoutePattern, Segment};
pub use table::{RouteMatch, RouteTable, RouteTableBuilder};

/// Strip a single leading `/`.
pub(crate) fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
