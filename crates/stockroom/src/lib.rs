//! # stockroom
//!
//! Inventory CRUD over PostgreSQL: products, categories, stock levels and
//! stock movements, served through a small route table.
//!
//! ## Features
//!
//! - **Self-numbering filters**: optional conditions are written with `$?`
//!   and numbered `$1, $2, …` without gaps ([`FilterQuery`])
//! - **Allow-listed updates**: partial updates only ever touch columns named
//!   in code ([`Changeset`], [`UpdateSet`])
//! - **Route matching**: exact lookup first, then `{param}` patterns, with
//!   overlapping patterns rejected up front ([`RouteTable`])
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient`
//!   is expected
//!
//! ## Dispatch
//!
//! ```ignore
//! use stockroom::{InventoryModule, Request};
//!
//! let module = InventoryModule::new(client)?;
//! let reply = module
//!     .dispatch(&Request::new("GET", "/products").with_query("search", "bolt"))
//!     .await;
//! assert_eq!(reply.status, 200);
//! ```

pub mod client;
pub mod error;
pub mod filter;
pub mod handler;
pub mod model;
pub mod module;
pub mod param;
pub mod patch;
pub mod request;
pub mod response;
pub mod route;
pub mod row;
pub mod trace;
pub mod validate;

pub use client::GenericClient;
pub use error::{StockError, StockResult};
pub use filter::{Blank, FilterQuery, Statement};
pub use handler::{InventoryHandler, ListLimits, MovementFilter, ProductFilter, StockLevelFilter};
pub use model::{
    CategoryPatch, Created, NewCategory, NewProduct, Product, ProductCategory, ProductPatch,
    StockLevel, StockMovement,
};
pub use module::{Endpoint, InventoryModule};
pub use param::{Param, ParamList};
pub use patch::{Changeset, Field, UpdateSet};
pub use request::Request;
pub use response::Reply;
pub use route::{Method, PathParams, RouteMatch, RoutePattern, RouteTable};
pub use row::{FromRow, RowExt};
pub use trace::TracedClient;
pub use validate::{ValidationCode, ValidationError, ValidationErrors};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

// Re-export tokio_postgres for convenience
pub use tokio_postgres;
