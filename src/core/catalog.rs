// Menu catalog: browsing, searching, and manager-only edits

use crate::core::accounts::{require_manager, Session};
use crate::db::{Database, MenuItem};
use crate::error::{CafeError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;

const MAX_ITEM_NAME_LENGTH: usize = 100;

pub struct Catalog {
    db: Arc<Database>,
}

impl Catalog {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The full menu
    pub async fn all_items(&self) -> Result<Vec<MenuItem>> {
        self.db.list_items().await
    }

    /// Exact-name lookup
    pub async fn search_by_name(&self, name: &str) -> Result<MenuItem> {
        let name = name.trim();
        self.db
            .find_item(name)
            .await?
            .ok_or_else(|| CafeError::ItemNotFound(name.to_string()))
    }

    /// All items of one type
    pub async fn search_by_type(&self, item_type: &str) -> Result<Vec<MenuItem>> {
        self.db.items_by_type(item_type.trim()).await
    }

    /// Add a new item to the menu. Managers only.
    pub async fn add_item(
        &self,
        session: &Session,
        name: &str,
        item_type: &str,
        price: Decimal,
        description: &str,
        image_url: &str,
    ) -> Result<()> {
        require_manager(session, "edit the menu")?;

        let name = validate_item_name(name)?;
        let price = validate_price(price)?;

        let item_type = item_type.trim();
        if item_type.is_empty() {
            return Err(CafeError::InvalidInput(
                "item type cannot be empty".to_string(),
            ));
        }

        self.db
            .add_item(&MenuItem {
                item_name: name.to_string(),
                item_type: item_type.to_string(),
                price,
                description: description.trim().to_string(),
                image_url: image_url.trim().to_string(),
            })
            .await
    }

    /// Remove an item from the menu. Managers only.
    pub async fn remove_item(&self, session: &Session, name: &str) -> Result<()> {
        require_manager(session, "edit the menu")?;
        self.db.delete_item(name.trim()).await
    }

    /// Rename an item. Managers only.
    pub async fn rename_item(&self, session: &Session, name: &str, new_name: &str) -> Result<()> {
        require_manager(session, "edit the menu")?;
        let new_name = validate_item_name(new_name)?;
        self.db.rename_item(name.trim(), new_name).await
    }

    /// Change an item's type. Managers only.
    pub async fn set_item_type(&self, session: &Session, name: &str, new_type: &str) -> Result<()> {
        require_manager(session, "edit the menu")?;
        self.db.update_item_type(name.trim(), new_type.trim()).await
    }

    /// Change an item's price. Managers only.
    pub async fn set_price(&self, session: &Session, name: &str, price: Decimal) -> Result<()> {
        require_manager(session, "edit the menu")?;
        let price = validate_price(price)?;
        self.db.update_item_price(name.trim(), price).await
    }

    /// Change an item's description. Managers only.
    pub async fn set_description(
        &self,
        session: &Session,
        name: &str,
        description: &str,
    ) -> Result<()> {
        require_manager(session, "edit the menu")?;
        self.db
            .update_item_description(name.trim(), description.trim())
            .await
    }

    /// Change an item's image URL. Managers only.
    pub async fn set_image_url(
        &self,
        session: &Session,
        name: &str,
        image_url: &str,
    ) -> Result<()> {
        require_manager(session, "edit the menu")?;
        self.db
            .update_item_image_url(name.trim(), image_url.trim())
            .await
    }
}

fn validate_item_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CafeError::InvalidInput(
            "item name cannot be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_ITEM_NAME_LENGTH {
        return Err(CafeError::InputTooLong(MAX_ITEM_NAME_LENGTH));
    }
    Ok(trimmed)
}

fn validate_price(price: Decimal) -> Result<Decimal> {
    if price < Decimal::ZERO {
        return Err(CafeError::InvalidInput(
            "price cannot be negative".to_string(),
        ));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name("  Espresso ").unwrap(), "Espresso");
        assert!(matches!(
            validate_item_name(""),
            Err(CafeError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_item_name(&"x".repeat(200)),
            Err(CafeError::InputTooLong(_))
        ));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::new(350, 2)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(matches!(
            validate_price(Decimal::new(-1, 2)),
            Err(CafeError::InvalidInput(_))
        ));
    }
}
