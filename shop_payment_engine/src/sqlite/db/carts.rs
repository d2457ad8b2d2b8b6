use log::debug;
use sqlx::SqliteConnection;

/// Removes every item from the given user's cart. Clearing an already-empty cart is not an
/// error.
pub async fn clear_cart(user_id: &str, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    debug!("🗃️🛒️ Cleared {} item(s) from the cart of user {user_id}", result.rows_affected());
    Ok(())
}

/// Adds an item to a user's cart, or bumps its quantity if already present. Exists for seeding
/// test and demo databases; shoppers manage carts through the storefront service.
pub async fn upsert_cart_item(
    user_id: &str,
    product_id: &str,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity;
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn cart_item_count(user_id: &str, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}
