/// SQL queries for orders and their line items
///
/// Placing an order writes the header and its lines in one transaction so a
/// half-written order can never appear.

use crate::db::models::{Order, OrderLine};
use crate::db::Database;
use crate::error::{CafeError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

impl Database {
    /// Most recent orders for one login, newest first
    pub async fn recent_orders_for(&self, login: &str, limit: i64) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, login, paid, order_time, total
            FROM orders
            WHERE login = $1
            ORDER BY order_time DESC
            LIMIT $2
            "#,
        )
        .bind(login)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(orders)
    }

    /// All orders placed since the given cutoff, newest first
    pub async fn orders_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, login, paid, order_time, total
            FROM orders
            WHERE order_time > $1
            ORDER BY order_time DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(self.pool())
        .await?;

        Ok(orders)
    }

    /// Look up one order by id
    pub async fn order_by_id(&self, order_id: i64) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT order_id, login, paid, order_time, total FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(order)
    }

    /// Line items of an order
    pub async fn order_lines(&self, order_id: i64) -> Result<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT order_id, item_name, quantity FROM order_items WHERE order_id = $1 ORDER BY item_name",
        )
        .bind(order_id)
        .fetch_all(self.pool())
        .await?;

        Ok(lines)
    }

    /// Insert a new unpaid order with its lines
    ///
    /// # Arguments
    /// * `login` - Owner of the order
    /// * `lines` - (item_name, quantity) pairs, already validated
    /// * `total` - Precomputed total price
    ///
    /// # Returns
    /// * `Ok(i64)` - The new order id
    pub async fn place_order(
        &self,
        login: &str,
        lines: &[(String, i32)],
        total: Decimal,
    ) -> Result<i64> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (login, paid, order_time, total)
            VALUES ($1, FALSE, now(), $2)
            RETURNING order_id
            "#,
        )
        .bind(login)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let order_id: i64 = row.get(0);

        for (item_name, quantity) in lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, item_name, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (order_id, item_name)
                DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity
                "#,
            )
            .bind(order_id)
            .bind(item_name)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order_id)
    }

    /// Add a line to an existing order and set its new total
    ///
    /// The caller decides whether the order may be changed; this just does
    /// the write, atomically.
    pub async fn add_order_line(
        &self,
        order_id: i64,
        item_name: &str,
        quantity: i32,
        new_total: Decimal,
    ) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, item_name, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (order_id, item_name)
            DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity
            "#,
        )
        .bind(order_id)
        .bind(item_name)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE orders SET total = $1 WHERE order_id = $2")
            .bind(new_total)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Mark an order as paid
    pub async fn mark_order_paid(&self, order_id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET paid = TRUE WHERE order_id = $1")
            .bind(order_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CafeError::OrderNotFound(order_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::MenuItem;

    // All tests here need a running PostgreSQL; run with:
    //   CAFE_TEST_DATABASE_URL=postgres://... cargo test -- --ignored

    fn unique_name(prefix: &str) -> String {
        format!("{}_{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap())
    }

    async fn setup_user_and_item(db: &Database) -> (String, String) {
        let login = unique_name("order_user");
        let item = unique_name("Mocha");

        db.create_user(&login, "secret", "").await.unwrap();
        db.add_item(&MenuItem {
            item_name: item.clone(),
            item_type: "Coffee".to_string(),
            price: Decimal::new(400, 2),
            description: "".to_string(),
            image_url: "".to_string(),
        })
        .await
        .unwrap();

        (login, item)
    }

    #[tokio::test]
    #[ignore]
    async fn test_place_order_with_lines() {
        let db = Database::new_test().await.unwrap();
        let (login, item) = setup_user_and_item(&db).await;

        let id = db
            .place_order(&login, &[(item.clone(), 2)], Decimal::new(800, 2))
            .await
            .unwrap();

        let order = db.order_by_id(id).await.unwrap().unwrap();
        assert_eq!(order.login, login);
        assert!(!order.paid);
        assert_eq!(order.total, Decimal::new(800, 2));

        let lines = db.order_lines(id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[tokio::test]
    #[ignore]
    async fn test_add_line_merges_quantity() {
        let db = Database::new_test().await.unwrap();
        let (login, item) = setup_user_and_item(&db).await;

        let id = db
            .place_order(&login, &[(item.clone(), 1)], Decimal::new(400, 2))
            .await
            .unwrap();

        db.add_order_line(id, &item, 2, Decimal::new(1200, 2))
            .await
            .unwrap();

        let lines = db.order_lines(id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);

        let order = db.order_by_id(id).await.unwrap().unwrap();
        assert_eq!(order.total, Decimal::new(1200, 2));
    }

    #[tokio::test]
    #[ignore]
    async fn test_mark_paid() {
        let db = Database::new_test().await.unwrap();
        let (login, item) = setup_user_and_item(&db).await;

        let id = db
            .place_order(&login, &[(item, 1)], Decimal::new(400, 2))
            .await
            .unwrap();

        db.mark_order_paid(id).await.unwrap();
        assert!(db.order_by_id(id).await.unwrap().unwrap().paid);

        let err = db.mark_order_paid(-1).await;
        assert!(matches!(err, Err(CafeError::OrderNotFound(-1))));
    }

    #[tokio::test]
    #[ignore]
    async fn test_recent_orders_ordering() {
        let db = Database::new_test().await.unwrap();
        let (login, item) = setup_user_and_item(&db).await;

        for _ in 0..3 {
            db.place_order(&login, &[(item.clone(), 1)], Decimal::new(400, 2))
                .await
                .unwrap();
        }

        let recent = db.recent_orders_for(&login, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].order_time >= recent[1].order_time);
    }
}
