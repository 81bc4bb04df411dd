//! Filtered statements with self-numbering placeholders.
//!
//! Handlers start from a fixed base statement and add zero or more
//! conditions, some of which only apply when the request supplied a value.
//! Conditions are written with the marker `$?`; the builder replaces each
//! marker with the next free `$n` and binds the value once per marker, so the
//! final numbering stays gapless however many optional filters were skipped.
//!
//! # Example
//!
//! ```ignore
//! use stockroom::filter::FilterQuery;
//!
//! let mut q = FilterQuery::new("SELECT * FROM products WHERE is_active = true");
//! q.and_where("(name ILIKE $? OR sku ILIKE $?)", "%bolt%".to_string());
//! q.and_where_opt("category_id = $?", category_id);
//!
//! let mut stmt = q.build();
//! stmt.push(" ORDER BY name").limit_offset(50, 0);
//! let products: Vec<Product> = stmt.fetch_all_as(&client).await?;
//! ```

mod blank;
mod builder;
mod statement;

#[cfg(test)]
mod tests;

pub use blank::Blank;
pub use builder::FilterQuery;
pub use statement::Statement;

/// Placeholder marker recognised in condition templates.
pub const MARKER: &str = "$?";

/// Highest `$n` already present in `sql` (0 when there is none).
pub(crate) fn max_placeholder(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut max = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                if let Ok(n) = sql[start..end].parse::<usize>() {
                    max = max.max(n);
                }
            }
            i = end;
        } else {
            i += 1;
        }
    }
    max
}
