//! End-to-end dispatch against a live database.
//!
//! Runs only when `DATABASE_URL` is set. All tables are session-local
//! temporary tables, so nothing outlives the test connection.

use serde_json::json;
use stockroom::{InventoryModule, Request, StockError, StockResult, TracedClient, UpdateSet};
use tokio_postgres::NoTls;
use tokio_postgres::types::Type;

const SCHEMA: &str = r#"
CREATE TEMP TABLE product_categories (
    id          SERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    parent_id   INT,
    code        TEXT,
    is_active   BOOLEAN NOT NULL DEFAULT true,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TEMP TABLE products (
    id              SERIAL PRIMARY KEY,
    sku             TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    description     TEXT,
    category_id     INT,
    brand           TEXT,
    model           TEXT,
    unit_of_measure TEXT NOT NULL DEFAULT 'each',
    weight          NUMERIC(10, 3),
    dimensions      TEXT,
    cost_price      NUMERIC(12, 2),
    selling_price   NUMERIC(12, 2),
    min_stock_level INT,
    max_stock_level INT,
    reorder_point   INT,
    is_active       BOOLEAN NOT NULL DEFAULT true,
    is_serialized   BOOLEAN NOT NULL DEFAULT false,
    is_batched      BOOLEAN NOT NULL DEFAULT false,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TEMP TABLE stock_levels (
    id                 SERIAL PRIMARY KEY,
    product_id         INT NOT NULL,
    warehouse_id       INT NOT NULL,
    location_id        INT,
    quantity_on_hand   INT NOT NULL DEFAULT 0,
    quantity_reserved  INT NOT NULL DEFAULT 0,
    quantity_available INT NOT NULL DEFAULT 0,
    last_counted_at    TIMESTAMPTZ,
    created_at         TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at         TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TEMP TABLE stock_movements (
    id             SERIAL PRIMARY KEY,
    product_id     INT NOT NULL,
    warehouse_id   INT NOT NULL,
    location_id    INT,
    movement_type  TEXT NOT NULL,
    quantity       INT NOT NULL,
    reference_type TEXT,
    reference_id   INT,
    reason         TEXT,
    notes          TEXT,
    user_id        INT NOT NULL,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

async fn connect() -> StockResult<Option<tokio_postgres::Client>> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping inventory_db");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(StockError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    client
        .batch_execute(SCHEMA)
        .await
        .map_err(StockError::from_db_error)?;
    Ok(Some(client))
}

#[tokio::test]
async fn product_lifecycle() -> StockResult<()> {
    let _ = dotenvy::dotenv();
    let Some(client) = connect().await? else {
        return Ok(());
    };
    let module = InventoryModule::new(TracedClient::new(client))?;

    let reply = module
        .dispatch(&Request::new("POST", "/categories").with_body(json!({"name": "Fasteners"})))
        .await;
    assert_eq!(reply.status, 201, "{:?}", reply.body);
    let category_id = reply.body["data"]["id"].as_i64().unwrap();

    let reply = module
        .dispatch(&Request::new("POST", "/products").with_body(json!({
            "sku": "B-100",
            "name": "Hex bolt",
            "category_id": category_id,
            "cost_price": "0.10",
            "selling_price": "0.25",
        })))
        .await;
    assert_eq!(reply.status, 201, "{:?}", reply.body);
    assert_eq!(reply.body["data"]["message"], "Product created successfully");
    let product_id = reply.body["data"]["id"].as_i64().unwrap();

    // Same SKU again.
    let reply = module
        .dispatch(
            &Request::new("POST", "/products")
                .with_body(json!({"sku": "B-100", "name": "Other bolt"})),
        )
        .await;
    assert_eq!(reply.status, 409);

    let reply = module
        .dispatch(
            &Request::new("GET", "/products")
                .with_query("search", "HEX")
                .with_query("category_id", category_id.to_string()),
        )
        .await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["data"]["count"], 1);
    assert_eq!(reply.body["data"]["products"][0]["sku"], "B-100");

    let reply = module
        .dispatch(&Request::new("GET", "/products").with_query("category_id", "999"))
        .await;
    assert_eq!(reply.body["data"], json!({"products": [], "count": 0}));

    let path = format!("/products/{product_id}");
    let reply = module
        .dispatch(
            &Request::new("PUT", path.as_str())
                .with_body(json!({"selling_price": "0.30", "sku": "HACKED"})),
        )
        .await;
    assert_eq!(reply.status, 200, "{:?}", reply.body);

    let reply = module.dispatch(&Request::new("GET", path.as_str())).await;
    assert_eq!(reply.body["data"]["sku"], "B-100");
    assert_eq!(reply.body["data"]["selling_price"], "0.30");

    let body = json!({"category_id": category_id, "cost_price": 9.5});
    let fields = body.as_object().cloned().unwrap_or_default();
    let affected = UpdateSet::from_json_fields(
        "products",
        &fields,
        &[("category_id", Type::INT4), ("cost_price", Type::NUMERIC)],
    )?
    .finish("id", i32::try_from(product_id).unwrap())?
    .execute(module.handler().client())
    .await?;
    assert_eq!(affected, 1);
    let reply = module.dispatch(&Request::new("GET", path.as_str())).await;
    assert_eq!(reply.body["data"]["cost_price"], "9.50");

    let reply = module.dispatch(&Request::new("DELETE", path.as_str())).await;
    assert_eq!(reply.status, 200);
    let reply = module.dispatch(&Request::new("GET", "/products")).await;
    assert_eq!(reply.body["data"], json!({"products": [], "count": 0}));
    let reply = module.dispatch(&Request::new("GET", path.as_str())).await;
    assert_eq!(reply.body["data"]["is_active"], false);

    let reply = module.dispatch(&Request::new("GET", "/products/424242")).await;
    assert_eq!(reply.status, 404);
    Ok(())
}

#[tokio::test]
async fn stock_queries_filter_and_order() -> StockResult<()> {
    let _ = dotenvy::dotenv();
    let Some(client) = connect().await? else {
        return Ok(());
    };
    client
        .batch_execute(
            "INSERT INTO stock_levels (product_id, warehouse_id, quantity_on_hand) \
             VALUES (2, 1, 5), (1, 2, 7), (1, 1, 3); \
             INSERT INTO stock_movements (product_id, warehouse_id, movement_type, quantity, user_id) \
             VALUES (1, 1, 'in', 10, 1), (1, 1, 'out', 4, 1), (2, 1, 'in', 5, 1);",
        )
        .await
        .map_err(StockError::from_db_error)?;
    let module = InventoryModule::new(client)?;

    let reply = module.dispatch(&Request::new("GET", "/stock-levels")).await;
    assert_eq!(reply.body["data"]["count"], 3);
    let rows = reply.body["data"]["stock_levels"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let order: Vec<(i64, i64)> = rows
        .iter()
        .map(|r| {
            (
                r["product_id"].as_i64().unwrap(),
                r["warehouse_id"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);

    let reply = module
        .dispatch(&Request::new("GET", "/stock-levels").with_query("warehouse_id", "2"))
        .await;
    assert_eq!(reply.body["data"]["count"], 1);

    let reply = module
        .dispatch(
            &Request::new("GET", "/stock-movements")
                .with_query("product_id", "1")
                .with_query("movement_type", "out"),
        )
        .await;
    let rows = reply.body["data"]["stock_movements"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantity"], 4);

    // Newest first: ids descend when timestamps tie.
    let reply = module
        .dispatch(&Request::new("GET", "/stock-movements").with_query("product_id", "1"))
        .await;
    let ids: Vec<i64> = reply.body["data"]["stock_movements"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![2, 1]);
    Ok(())
}
