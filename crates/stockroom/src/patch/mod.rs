//! Partial updates: `UPDATE <table> SET f = $n, ... WHERE <id> = $m`.
//!
//! The set of updatable columns is fixed per entity. Typed patches declare it
//! as their fields (see [`changeset!`](crate::changeset)); loosely typed callers
//! pass an allow-list of columns and their Postgres types to
//! [`UpdateSet::from_json_fields`]. Either way column names come from code,
//! never from the request body.

mod field;
mod update;


pub use field::Field;
pub use update::UpdateSet;

use crate::error::StockResult;
use crate::filter::Statement;
use tokio_postgres::types::ToSql;

/// A typed, per-entity update payload.
pub trait Changeset {
    /// Target table.
    const TABLE: &'static str;
    /// Updatable columns, in the order they are emitted.
    const FIELDS: &'static [&'static str];

    /// Push every present field onto `set`, in [`FIELDS`](Self::FIELDS) order.
    fn apply(&self, set: &mut UpdateSet);

    /// Number of present fields.
    fn present_count(&self) -> usize;

    /// Build the UPDATE for the row whose `id_column` equals `id`.
    ///
    /// Fails with [`StockError::NoUpdatableFields`](crate::StockError::NoUpdatableFields)
    /// when no field is present.
    fn update_statement<I>(&self, id_column: &str, id: I) -> StockResult<Statement>
    where
        I: ToSql + Send + Sync + 'static,
    {
        let mut set = UpdateSet::new(Self::TABLE);
        self.apply(&mut set);
        set.finish(id_column, id)
    }
}

/// Declare a typed patch struct and its [`Changeset`] impl.
///
/// Every field becomes a `Field<T>` defaulting to `Absent`; unknown keys in
/// the JSON body are ignored on deserialization.
///
/// ```ignore
/// stockroom::changeset! {
///     pub struct WarehousePatch for "warehouses" {
///         name: String,
///         address: Option<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! changeset {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident for $table:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: $crate::patch::Field<$ty>, )*
        }

        impl $crate::patch::Changeset for $name {
            const TABLE: &'static str = $table;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            fn apply(&self, set: &mut $crate::patch::UpdateSet) {
                $(
                    if let $crate::patch::Field::Set(value) = &self.$field {
                        set.set(stringify!($field), value.clone());
                    }
                )*
            }

            fn present_count(&self) -> usize {
                0 $( + usize::from(self.$field.is_set()) )*
            }
        }
    };
}
