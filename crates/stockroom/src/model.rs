//! Inventory records, create inputs and update patches.

use crate::changeset;
use crate::error::StockResult;
use crate::row::{FromRow, RowExt};
use crate::validate::{ValidationCode, ValidationError, ValidationErrors};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub unit_of_measure: String,
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
    pub cost_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub min_stock_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub reorder_point: Option<i32>,
    pub is_active: bool,
    pub is_serialized: bool,
    pub is_batched: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow for Product {
    fn from_row(row: &Row) -> StockResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            sku: row.try_get_column("sku")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            category_id: row.try_get_column("category_id")?,
            brand: row.try_get_column("brand")?,
            model: row.try_get_column("model")?,
            unit_of_measure: row.try_get_column("unit_of_measure")?,
            weight: row.try_get_column("weight")?,
            dimensions: row.try_get_column("dimensions")?,
            cost_price: row.try_get_column("cost_price")?,
            selling_price: row.try_get_column("selling_price")?,
            min_stock_level: row.try_get_column("min_stock_level")?,
            max_stock_level: row.try_get_column("max_stock_level")?,
            reorder_point: row.try_get_column("reorder_point")?,
            is_active: row.try_get_column("is_active")?,
            is_serialized: row.try_get_column("is_serialized")?,
            is_batched: row.try_get_column("is_batched")?,
            created_at: row.try_get_column("created_at")?,
            updated_at: row.try_get_column("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow for ProductCategory {
    fn from_row(row: &Row) -> StockResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            parent_id: row.try_get_column("parent_id")?,
            code: row.try_get_column("code")?,
            is_active: row.try_get_column("is_active")?,
            created_at: row.try_get_column("created_at")?,
            updated_at: row.try_get_column("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLevel {
    pub id: i32,
    pub product_id: i32,
    pub warehouse_id: i32,
    pub location_id: Option<i32>,
    pub quantity_on_hand: i32,
    pub quantity_reserved: i32,
    pub quantity_available: i32,
    pub last_counted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow for StockLevel {
    fn from_row(row: &Row) -> StockResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            product_id: row.try_get_column("product_id")?,
            warehouse_id: row.try_get_column("warehouse_id")?,
            location_id: row.try_get_column("location_id")?,
            quantity_on_hand: row.try_get_column("quantity_on_hand")?,
            quantity_reserved: row.try_get_column("quantity_reserved")?,
            quantity_available: row.try_get_column("quantity_available")?,
            last_counted_at: row.try_get_column("last_counted_at")?,
            created_at: row.try_get_column("created_at")?,
            updated_at: row.try_get_column("updated_at")?,
        })
    }
}

/// Movement kinds recorded in `stock_movements.movement_type`.
pub const MOVEMENT_TYPES: &[&str] = &["in", "out", "transfer", "adjustment"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMovement {
    pub id: i32,
    pub product_id: i32,
    pub warehouse_id: i32,
    pub location_id: Option<i32>,
    pub movement_type: String,
    pub quantity: i32,
    pub reference_type: Option<String>,
    pub reference_id: Option<i32>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl FromRow for StockMovement {
    fn from_row(row: &Row) -> StockResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            product_id: row.try_get_column("product_id")?,
            warehouse_id: row.try_get_column("warehouse_id")?,
            location_id: row.try_get_column("location_id")?,
            movement_type: row.try_get_column("movement_type")?,
            quantity: row.try_get_column("quantity")?,
            reference_type: row.try_get_column("reference_type")?,
            reference_id: row.try_get_column("reference_id")?,
            reason: row.try_get_column("reason")?,
            notes: row.try_get_column("notes")?,
            user_id: row.try_get_column("user_id")?,
            created_at: row.try_get_column("created_at")?,
        })
    }
}

/// `id` and timestamps returned by an INSERT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Created {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow for Created {
    fn from_row(row: &Row) -> StockResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            created_at: row.try_get_column("created_at")?,
            updated_at: row.try_get_column("updated_at")?,
        })
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub cost_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
}

impl NewProduct {
    pub fn validate(&self) -> ValidationErrors {
        let mut errs = ValidationErrors::default();
        errs.require("sku", &self.sku);
        errs.require("name", &self.name);
        let prices = [
            ("cost_price", self.cost_price),
            ("selling_price", self.selling_price),
        ];
        for (field, price) in prices {
            if price.is_some_and(|p| p.is_sign_negative()) {
                errs.push(ValidationError::new(
                    field,
                    ValidationCode::Range,
                    format!("{field} must not be negative"),
                ));
            }
        }
        errs
    }
}

/// Body of `POST /categories`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub code: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> ValidationErrors {
        let mut errs = ValidationErrors::default();
        errs.require("name", &self.name);
        errs
    }
}

changeset! {
    /// Body of `PUT /products/{id}`.
    pub struct ProductPatch for "products" {
        name: String,
        description: Option<String>,
        category_id: Option<i32>,
        cost_price: Option<Decimal>,
        selling_price: Option<Decimal>,
        is_active: bool,
    }
}

changeset! {
    /// Body of `PUT /categories/{id}`.
    pub struct CategoryPatch for "product_categories" {
        name: String,
        description: Option<String>,
        parent_id: Option<i32>,
        code: Option<String>,
        is_active: bool,
    }
}
