//! Inventory operations against any [`GenericClient`].
//!
//! Every operation validates its input before building a statement, so a
//! rejected request never reaches storage.

use crate::client::GenericClient;
use crate::error::{StockError, StockResult};
use crate::filter::{FilterQuery, Statement};
use crate::model::{
    CategoryPatch, Created, MOVEMENT_TYPES, NewCategory, NewProduct, Product, ProductCategory,
    ProductPatch, StockLevel, StockMovement,
};
use crate::patch::Changeset;
use crate::request::Request;
use crate::validate::{ValidationCode, ValidationError, ValidationErrors};

/// Page size bounds for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    /// Rows per page when the caller does not ask.
    pub default: i64,
    /// Upper bound on a requested page size.
    pub max: i64,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            default: 50,
            max: 200,
        }
    }
}

impl ListLimits {
    /// `(limit, offset)` for a 1-based `page`.
    pub fn window(&self, page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
        let limit = limit.unwrap_or(self.default).clamp(1, self.max.max(1));
        let page = page.unwrap_or(1).max(1);
        (limit, (page - 1).saturating_mul(limit))
    }
}

/// Query string of `GET /products`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Matched against name and SKU.
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ProductFilter {
    pub fn from_request(req: &Request) -> StockResult<Self> {
        Ok(Self {
            search: req.query_str("search").map(str::to_string),
            category_id: req.query_parse("category_id")?,
            page: req.query_parse("page")?,
            limit: req.query_parse("limit")?,
        })
    }
}

/// Query string of `GET /stock-levels`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockLevelFilter {
    pub product_id: Option<i32>,
    pub warehouse_id: Option<i32>,
}

impl StockLevelFilter {
    pub fn from_request(req: &Request) -> StockResult<Self> {
        Ok(Self {
            product_id: req.query_parse("product_id")?,
            warehouse_id: req.query_parse("warehouse_id")?,
        })
    }
}

/// Query string of `GET /stock-movements`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementFilter {
    pub product_id: Option<i32>,
    pub warehouse_id: Option<i32>,
    pub movement_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl MovementFilter {
    pub fn from_request(req: &Request) -> StockResult<Self> {
        let movement_type = req.query_str("movement_type").map(str::to_ascii_lowercase);
        if let Some(kind) = &movement_type {
            if !MOVEMENT_TYPES.contains(&kind.as_str()) {
                let mut errs = ValidationErrors::default();
                errs.push(ValidationError::new(
                    "movement_type",
                    ValidationCode::OneOf,
                    format!("movement_type must be one of: {}", MOVEMENT_TYPES.join(", ")),
                ));
                return Err(errs.into());
            }
        }
        Ok(Self {
            product_id: req.query_parse("product_id")?,
            warehouse_id: req.query_parse("warehouse_id")?,
            movement_type,
            page: req.query_parse("page")?,
            limit: req.query_parse("limit")?,
        })
    }
}

/// Products, categories and stock queries over one storage client.
#[derive(Debug, Clone)]
pub struct InventoryHandler<C> {
    client: C,
    limits: ListLimits,
}

impl<C> InventoryHandler<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            limits: ListLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ListLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn limits(&self) -> ListLimits {
        self.limits
    }

    pub fn into_client(self) -> C {
        self.client
    }

    // ==================== Statements ====================

    /// Active products, optionally narrowed by search term and category.
    pub fn products_query(&self, filter: &ProductFilter) -> Statement {
        let mut q = FilterQuery::new("SELECT * FROM products WHERE is_active = true");
        let term = filter.search.as_deref().map(str::trim).unwrap_or_default();
        if !term.is_empty() {
            q.and_where("(name ILIKE $? OR sku ILIKE $?)", format!("%{term}%"));
        }
        q.and_where_opt("category_id = $?", filter.category_id);

        let (limit, offset) = self.limits.window(filter.page, filter.limit);
        let mut stmt = q.build();
        stmt.push(" ORDER BY name").limit_offset(limit, offset);
        stmt
    }

    pub fn stock_levels_query(&self, filter: &StockLevelFilter) -> Statement {
        let mut q = FilterQuery::new("SELECT * FROM stock_levels WHERE 1=1");
        q.and_where_opt("product_id = $?", filter.product_id)
            .and_where_opt("warehouse_id = $?", filter.warehouse_id);

        let mut stmt = q.build();
        stmt.push(" ORDER BY product_id, warehouse_id");
        stmt
    }

    /// Movements, newest first.
    pub fn stock_movements_query(&self, filter: &MovementFilter) -> Statement {
        let mut q = FilterQuery::new("SELECT * FROM stock_movements WHERE 1=1");
        q.and_where_opt("product_id = $?", filter.product_id)
            .and_where_opt("warehouse_id = $?", filter.warehouse_id)
            .and_where_opt("movement_type = $?", filter.movement_type.clone());

        let (limit, offset) = self.limits.window(filter.page, filter.limit);
        let mut stmt = q.build();
        stmt.push(" ORDER BY created_at DESC, id DESC")
            .limit_offset(limit, offset);
        stmt
    }
}

impl<C: GenericClient> InventoryHandler<C> {
    // ==================== Products ====================

    pub async fn list_products(&self, filter: &ProductFilter) -> StockResult<Vec<Product>> {
        self.products_query(filter).fetch_all_as(&self.client).await
    }

    pub async fn get_product(&self, id: i32) -> StockResult<Product> {
        Statement::new("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_opt_as(&self.client)
            .await?
            .ok_or_else(|| StockError::not_found("Product not found"))
    }

    pub async fn create_product(&self, input: &NewProduct) -> StockResult<Created> {
        input.validate().into_result()?;

        Statement::new(
            "INSERT INTO products \
             (sku, name, description, category_id, cost_price, selling_price, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, true) \
             RETURNING id, created_at, updated_at",
        )
        .bind(input.sku.trim().to_string())
        .bind(input.name.trim().to_string())
        .bind(input.description.clone())
        .bind(input.category_id)
        .bind(input.cost_price)
        .bind(input.selling_price)
        .fetch_one_as(&self.client)
        .await
    }

    pub async fn update_product(&self, id: i32, patch: &ProductPatch) -> StockResult<()> {
        let stmt = patch.update_statement("id", id)?;
        match stmt.execute(&self.client).await? {
            0 => Err(StockError::not_found("Product not found")),
            _ => Ok(()),
        }
    }

    /// Soft delete: the row stays, `is_active` goes false.
    pub async fn delete_product(&self, id: i32) -> StockResult<()> {
        let affected = Statement::new("UPDATE products SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.client)
            .await?;
        match affected {
            0 => Err(StockError::not_found("Product not found")),
            _ => Ok(()),
        }
    }

    // ==================== Stock ====================

    pub async fn list_stock_levels(
        &self,
        filter: &StockLevelFilter,
    ) -> StockResult<Vec<StockLevel>> {
        self.stock_levels_query(filter)
            .fetch_all_as(&self.client)
            .await
    }

    pub async fn list_stock_movements(
        &self,
        filter: &MovementFilter,
    ) -> StockResult<Vec<StockMovement>> {
        self.stock_movements_query(filter)
            .fetch_all_as(&self.client)
            .await
    }

    // ==================== Categories ====================

    pub async fn list_categories(&self) -> StockResult<Vec<ProductCategory>> {
        Statement::new("SELECT * FROM product_categories WHERE is_active = true ORDER BY name")
            .fetch_all_as(&self.client)
            .await
    }

    pub async fn get_category(&self, id: i32) -> StockResult<ProductCategory> {
        Statement::new("SELECT * FROM product_categories WHERE id = $1")
            .bind(id)
            .fetch_opt_as(&self.client)
            .await?
            .ok_or_else(|| StockError::not_found("Category not found"))
    }

    pub async fn create_category(&self, input: &NewCategory) -> StockResult<Created> {
        input.validate().into_result()?;

        Statement::new(
            "INSERT INTO product_categories (name, description, parent_id, code) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, created_at, updated_at",
        )
        .bind(input.name.trim().to_string())
        .bind(input.description.clone())
        .bind(input.parent_id)
        .bind(input.code.clone())
        .fetch_one_as(&self.client)
        .await
    }

    pub async fn update_category(&self, id: i32, patch: &CategoryPatch) -> StockResult<()> {
        let stmt = patch.update_statement("id", id)?;
        match stmt.execute(&self.client).await? {
            0 => Err(StockError::not_found("Category not found")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> InventoryHandler<()> {
        InventoryHandler::new(())
    }

    #[test]
    fn window_defaults_and_caps() {
        let limits = ListLimits::default();
        assert_eq!(limits.window(None, None), (50, 0));
        assert_eq!(limits.window(Some(3), Some(20)), (20, 40));
        assert_eq!(limits.window(Some(1), Some(10_000)), (200, 0));
        assert_eq!(limits.window(Some(0), Some(-5)), (1, 0));
    }

    #[test]
    fn products_query_without_filters() {
        let stmt = handler().products_query(&ProductFilter::default());
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM products WHERE is_active = true ORDER BY name LIMIT $1 OFFSET $2"
        );
        assert_eq!(stmt.params().debug_values(), vec!["50", "0"]);
    }

    #[test]
    fn search_binds_one_term_twice() {
        let filter = ProductFilter {
            search: Some(" bolt ".into()),
            category_id: Some(7),
            ..Default::default()
        };
        let stmt = handler().products_query(&filter);
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM products WHERE is_active = true \
             AND (name ILIKE $1 OR sku ILIKE $2) AND category_id = $3 \
             ORDER BY name LIMIT $4 OFFSET $5"
        );
        assert_eq!(
            stmt.params().debug_values(),
            vec!["\"%bolt%\"", "\"%bolt%\"", "Some(7)", "50", "0"]
        );
    }

    #[test]
    fn blank_search_is_skipped() {
        let filter = ProductFilter {
            search: Some("   ".into()),
            category_id: Some(2),
            ..Default::default()
        };
        let stmt = handler().products_query(&filter);
        assert!(stmt.sql().contains("AND category_id = $1 ORDER BY"));
        assert!(!stmt.sql().contains("ILIKE"));
    }

    #[test]
    fn stock_levels_query_numbers_from_one() {
        let filter = StockLevelFilter {
            product_id: None,
            warehouse_id: Some(3),
        };
        let stmt = handler().stock_levels_query(&filter);
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM stock_levels WHERE 1=1 AND warehouse_id = $1 \
             ORDER BY product_id, warehouse_id"
        );
        assert_eq!(stmt.params().len(), 1);
    }

    #[test]
    fn movements_newest_first() {
        let filter = MovementFilter {
            product_id: Some(4),
            movement_type: Some("out".into()),
            limit: Some(10),
            ..Default::default()
        };
        let stmt = handler().stock_movements_query(&filter);
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM stock_movements WHERE 1=1 AND product_id = $1 \
             AND movement_type = $2 ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn unknown_movement_type_is_rejected() {
        let req = Request::new("GET", "/stock-movements").with_query("movement_type", "teleport");
        let err = MovementFilter::from_request(&req).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("movement_type must be one of"));

        let req = Request::new("GET", "/stock-movements").with_query("movement_type", "IN");
        let filter = MovementFilter::from_request(&req).unwrap();
        assert_eq!(filter.movement_type.as_deref(), Some("in"));
    }

    #[test]
    fn product_filter_reads_query_string() {
        let req = Request::new("GET", "/products")
            .with_query("search", "nut")
            .with_query("page", "2");
        let filter = ProductFilter::from_request(&req).unwrap();
        assert_eq!(filter.search.as_deref(), Some("nut"));
        assert_eq!(filter.page, Some(2));
        assert_eq!(filter.category_id, None);
    }
}
