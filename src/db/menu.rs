/// SQL queries for the menu
///
/// Menu items are keyed by name; it's the menu's natural key.

use crate::db::models::MenuItem;
use crate::db::Database;
use crate::error::{CafeError, Result};
use rust_decimal::Decimal;

const ITEM_COLUMNS: &str = "item_name, type AS item_type, price, description, image_url";

impl Database {
    /// List the whole menu, grouped by type
    pub async fn list_items(&self) -> Result<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {} FROM menu ORDER BY type, item_name",
            ITEM_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    /// Look up a single item by exact name
    pub async fn find_item(&self, item_name: &str) -> Result<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {} FROM menu WHERE item_name = $1",
            ITEM_COLUMNS
        ))
        .bind(item_name)
        .fetch_optional(self.pool())
        .await?;

        Ok(item)
    }

    /// All items of a given type (Coffee, Tea, ...)
    pub async fn items_by_type(&self, item_type: &str) -> Result<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {} FROM menu WHERE type = $1 ORDER BY item_name",
            ITEM_COLUMNS
        ))
        .bind(item_type)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    /// Add a new menu item
    ///
    /// # Returns
    /// * `Err(CafeError::InvalidInput)` - If an item with that name exists
    pub async fn add_item(&self, item: &MenuItem) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO menu (item_name, type, price, description, image_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.item_name)
        .bind(&item.item_type)
        .bind(item.price)
        .bind(&item.description)
        .bind(&item.image_url)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                Err(CafeError::InvalidInput(format!(
                    "'{}' is already on the menu",
                    item.item_name
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an item by name
    pub async fn delete_item(&self, item_name: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM menu WHERE item_name = $1")
            .bind(item_name)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CafeError::ItemNotFound(item_name.to_string()));
        }

        Ok(())
    }

    /// Rename an item
    pub async fn rename_item(&self, item_name: &str, new_name: &str) -> Result<()> {
        self.update_item_column(item_name, "item_name", new_name)
            .await
    }

    /// Change an item's type
    pub async fn update_item_type(&self, item_name: &str, new_type: &str) -> Result<()> {
        self.update_item_column(item_name, "type", new_type).await
    }

    /// Change an item's price
    pub async fn update_item_price(&self, item_name: &str, new_price: Decimal) -> Result<()> {
        let result = sqlx::query("UPDATE menu SET price = $1 WHERE item_name = $2")
            .bind(new_price)
            .bind(item_name)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CafeError::ItemNotFound(item_name.to_string()));
        }

        Ok(())
    }

    /// Change an item's description
    pub async fn update_item_description(&self, item_name: &str, description: &str) -> Result<()> {
        self.update_item_column(item_name, "description", description)
            .await
    }

    /// Change an item's image URL
    pub async fn update_item_image_url(&self, item_name: &str, image_url: &str) -> Result<()> {
        self.update_item_column(item_name, "image_url", image_url)
            .await
    }

    /// Shared UPDATE for the text columns. The column name comes from a
    /// fixed set of callers above, never from user input.
    async fn update_item_column(&self, item_name: &str, column: &str, value: &str) -> Result<()> {
        let result = sqlx::query(&format!(
            "UPDATE menu SET {} = $1 WHERE item_name = $2",
            column
        ))
        .bind(value)
        .bind(item_name)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CafeError::ItemNotFound(item_name.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    // All tests here need a running PostgreSQL; run with:
    //   CAFE_TEST_DATABASE_URL=postgres://... cargo test -- --ignored

    fn sample_item(name: &str) -> MenuItem {
        MenuItem {
            item_name: name.to_string(),
            item_type: "Coffee".to_string(),
            price: Decimal::new(350, 2), // 3.50
            description: "double shot".to_string(),
            image_url: "".to_string(),
        }
    }

    fn unique_name(prefix: &str) -> String {
        format!("{}_{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap())
    }

    #[tokio::test]
    #[ignore]
    async fn test_add_and_find_item() {
        let db = Database::new_test().await.unwrap();
        let name = unique_name("Espresso");

        db.add_item(&sample_item(&name)).await.unwrap();

        let item = db.find_item(&name).await.unwrap().unwrap();
        assert_eq!(item.price, Decimal::new(350, 2));
        assert_eq!(item.item_type, "Coffee");
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_price_and_delete() {
        let db = Database::new_test().await.unwrap();
        let name = unique_name("Latte");

        db.add_item(&sample_item(&name)).await.unwrap();
        db.update_item_price(&name, Decimal::new(425, 2))
            .await
            .unwrap();

        let item = db.find_item(&name).await.unwrap().unwrap();
        assert_eq!(item.price, Decimal::new(425, 2));

        db.delete_item(&name).await.unwrap();
        assert!(db.find_item(&name).await.unwrap().is_none());

        let err = db.delete_item(&name).await;
        assert!(matches!(err, Err(CafeError::ItemNotFound(_))));
    }
}
