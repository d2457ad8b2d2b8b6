use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{db_types::Product, traits::CatalogError};

/// Fetches all products matching any of the given ids in a single query. Missing ids are simply
/// absent from the result.
pub async fn fetch_products_by_ids(
    product_ids: &[String],
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE id IN (");
    let mut ids = builder.separated(", ");
    for id in product_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(")");
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok(products)
}

pub async fn fetch_product_by_id(product_id: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Takes `quantity` units out of stock, but only if that many units remain. The guard lives in
/// the WHERE clause so that concurrent decrements can never drive stock negative.
pub async fn decrement_stock(
    product_id: &str,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), CatalogError> {
    let result = sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1")
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        // Nothing changed. Either the product is gone, or there was not enough stock.
        return match fetch_product_by_id(product_id, conn).await? {
            Some(product) => Err(CatalogError::InsufficientStock {
                product_id: product_id.to_string(),
                available: product.stock,
                requested: quantity,
            }),
            None => Err(CatalogError::ProductNotFound(product_id.to_string())),
        };
    }
    debug!("🗃️📦️ Stock for product {product_id} reduced by {quantity}");
    Ok(())
}

/// Puts `quantity` units back into stock, e.g. after an order cancellation.
pub async fn restore_stock(product_id: &str, quantity: i64, conn: &mut SqliteConnection) -> Result<(), CatalogError> {
    let result = sqlx::query("UPDATE products SET stock = stock + $1 WHERE id = $2")
        .bind(quantity)
        .bind(product_id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::ProductNotFound(product_id.to_string()));
    }
    debug!("🗃️📦️ Stock for product {product_id} increased by {quantity}");
    Ok(())
}

/// Inserts a product into the catalog. The payment service itself never creates products; this
/// exists for seeding test and demo databases.
pub async fn insert_product(product: &Product, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO products (id, seller_id, name, price, stock) VALUES ($1, $2, $3, $4, $5)")
        .bind(&product.id)
        .bind(&product.seller_id)
        .bind(&product.name)
        .bind(product.price.value())
        .bind(product.stock)
        .execute(conn)
        .await?;
    Ok(())
}
