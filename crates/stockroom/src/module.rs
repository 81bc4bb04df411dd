//! The inventory module: route table plus dispatch onto [`InventoryHandler`].

use crate::client::GenericClient;
use crate::error::{StockError, StockResult};
use crate::handler::{
    InventoryHandler, ListLimits, MovementFilter, ProductFilter, StockLevelFilter,
};
use crate::model::{CategoryPatch, NewCategory, NewProduct, ProductPatch};
use crate::request::Request;
use crate::response::Reply;
use crate::route::{Method, PathParams, RouteTable};
use std::sync::Arc;

/// Module code reported to the host.
pub const CODE: &str = "inventory";
/// Module version reported to the host.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Every operation the module serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListProducts,
    CreateProduct,
    GetProduct,
    UpdateProduct,
    DeleteProduct,
    ListStockLevels,
    ListStockMovements,
    ListCategories,
    CreateCategory,
    GetCategory,
    UpdateCategory,
}

impl Endpoint {
    /// Registration table, in the order routes are listed.
    pub const ROUTES: [(Method, &'static str, Endpoint); 11] = [
        (Method::Get, "/products", Endpoint::ListProducts),
        (Method::Post, "/products", Endpoint::CreateProduct),
        (Method::Get, "/products/{id}", Endpoint::GetProduct),
        (Method::Put, "/products/{id}", Endpoint::UpdateProduct),
        (Method::Delete, "/products/{id}", Endpoint::DeleteProduct),
        (Method::Get, "/stock-levels", Endpoint::ListStockLevels),
        (Method::Get, "/stock-movements", Endpoint::ListStockMovements),
        (Method::Get, "/categories", Endpoint::ListCategories),
        (Method::Post, "/categories", Endpoint::CreateCategory),
        (Method::Get, "/categories/{id}", Endpoint::GetCategory),
        (Method::Put, "/categories/{id}", Endpoint::UpdateCategory),
    ];

    /// Route table over [`ROUTES`](Self::ROUTES).
    pub fn table() -> StockResult<RouteTable<Endpoint>> {
        let mut builder = RouteTable::builder();
        for (method, path, endpoint) in Self::ROUTES {
            builder = builder.route(method, path, endpoint)?;
        }
        Ok(builder.build())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListProducts => "list_products",
            Self::CreateProduct => "create_product",
            Self::GetProduct => "get_product",
            Self::UpdateProduct => "update_product",
            Self::DeleteProduct => "delete_product",
            Self::ListStockLevels => "list_stock_levels",
            Self::ListStockMovements => "list_stock_movements",
            Self::ListCategories => "list_categories",
            Self::CreateCategory => "create_category",
            Self::GetCategory => "get_category",
            Self::UpdateCategory => "update_category",
        }
    }

    /// Message reported when storage fails.
    fn failure(&self) -> &'static str {
        match self {
            Self::ListProducts => "Failed to fetch products",
            Self::CreateProduct => "Failed to create product",
            Self::GetProduct => "Failed to fetch product",
            Self::UpdateProduct => "Failed to update product",
            Self::DeleteProduct => "Failed to delete product",
            Self::ListStockLevels => "Failed to fetch stock levels",
            Self::ListStockMovements => "Failed to fetch stock movements",
            Self::ListCategories => "Failed to fetch categories",
            Self::CreateCategory => "Failed to create category",
            Self::GetCategory => "Failed to fetch category",
            Self::UpdateCategory => "Failed to update category",
        }
    }
}

/// Inventory routes bound to one storage client.
///
/// Cloning shares the route table.
#[derive(Debug, Clone)]
pub struct InventoryModule<C> {
    handler: InventoryHandler<C>,
    routes: Arc<RouteTable<Endpoint>>,
}

impl<C: GenericClient> InventoryModule<C> {
    /// Build the route table around `client`.
    pub fn new(client: C) -> StockResult<Self> {
        let routes = Endpoint::table()?;
        tracing::info!(
            module = CODE,
            version = VERSION,
            routes = routes.len(),
            "inventory module initialized"
        );
        Ok(Self {
            handler: InventoryHandler::new(client),
            routes: Arc::new(routes),
        })
    }

    pub fn with_limits(mut self, limits: ListLimits) -> Self {
        self.handler = self.handler.with_limits(limits);
        self
    }

    pub fn code(&self) -> &'static str {
        CODE
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn routes(&self) -> &RouteTable<Endpoint> {
        &self.routes
    }

    pub fn handler(&self) -> &InventoryHandler<C> {
        &self.handler
    }

    /// Resolve and run one request. Never fails: every error becomes a reply.
    pub async fn dispatch(&self, req: &Request) -> Reply {
        let matched = match self.routes.resolve(&req.method, &req.path) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::debug!(method = %req.method, path = %req.path, "no route");
                return Reply::from_error(&err, "Failed to route request");
            }
        };

        let endpoint = *matched.handler;
        match self.call(endpoint, &matched.params, req).await {
            Ok(reply) => reply,
            Err(err) => {
                if err.status_code() >= 500 {
                    tracing::error!(
                        endpoint = endpoint.name(),
                        error = %err,
                        "{}",
                        endpoint.failure()
                    );
                }
                Reply::from_error(&err, endpoint.failure())
            }
        }
    }

    /// Release the module. The client is handed back to the caller.
    pub fn shutdown(self) -> C {
        tracing::info!(module = CODE, "inventory module shut down");
        self.handler.into_client()
    }

    async fn call(
        &self,
        endpoint: Endpoint,
        params: &PathParams,
        req: &Request,
    ) -> StockResult<Reply> {
        let h = &self.handler;
        match endpoint {
            Endpoint::ListProducts => {
                let filter = ProductFilter::from_request(req)?;
                Ok(Reply::list("products", &h.list_products(&filter).await?))
            }
            Endpoint::CreateProduct => {
                let input: NewProduct = req.json()?;
                let created = h.create_product(&input).await?;
                Ok(Reply::created(serde_json::json!({
                    "id": created.id,
                    "created_at": created.created_at,
                    "message": "Product created successfully",
                })))
            }
            Endpoint::GetProduct => {
                let id = path_id(params, "product")?;
                Ok(Reply::ok(h.get_product(id).await?))
            }
            Endpoint::UpdateProduct => {
                let id = path_id(params, "product")?;
                let patch: ProductPatch = req.json()?;
                h.update_product(id, &patch).await?;
                Ok(Reply::message("Product updated successfully"))
            }
            Endpoint::DeleteProduct => {
                let id = path_id(params, "product")?;
                h.delete_product(id).await?;
                Ok(Reply::message("Product deleted successfully"))
            }
            Endpoint::ListStockLevels => {
                let filter = StockLevelFilter::from_request(req)?;
                Ok(Reply::list("stock_levels", &h.list_stock_levels(&filter).await?))
            }
            Endpoint::ListStockMovements => {
                let filter = MovementFilter::from_request(req)?;
                Ok(Reply::list("stock_movements", &h.list_stock_movements(&filter).await?))
            }
            Endpoint::ListCategories => {
                Ok(Reply::list("categories", &h.list_categories().await?))
            }
            Endpoint::CreateCategory => {
                let input: NewCategory = req.json()?;
                let created = h.create_category(&input).await?;
                Ok(Reply::created(serde_json::json!({
                    "id": created.id,
                    "created_at": created.created_at,
                    "message": "Category created successfully",
                })))
            }
            Endpoint::GetCategory => {
                let id = path_id(params, "category")?;
                Ok(Reply::ok(h.get_category(id).await?))
            }
            Endpoint::UpdateCategory => {
                let id = path_id(params, "category")?;
                let patch: CategoryPatch = req.json()?;
                h.update_category(id, &patch).await?;
                Ok(Reply::message("Category updated successfully"))
            }
        }
    }
}

/// The `{id}` segment as a positive integer.
fn path_id(params: &PathParams, entity: &str) -> StockResult<i32> {
    params
        .parse::<i32>("id")
        .filter(|id| *id > 0)
        .ok_or_else(|| StockError::bad_request(format!("Invalid {entity} ID")))
}
