/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User roles, stored as TEXT in the `users.type` column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    Customer,
    Employee,
    Manager,
}

impl UserRole {
    /// Employees and managers count as staff; customers don't
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Employee | UserRole::Manager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Employee => "Employee",
            UserRole::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(UserRole::Customer),
            "Employee" => Ok(UserRole::Employee),
            "Manager" => Ok(UserRole::Manager),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// A café account. `role` comes back as TEXT (`type AS role` in queries).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub login: String,
    pub password: String,
    pub phone_num: String,
    pub fav_items: String,
    pub role: String,
}

impl User {
    /// Parse the stored role string. Unknown values fall back to Customer
    /// rather than poisoning the whole session.
    pub fn role(&self) -> UserRole {
        self.role.parse().unwrap_or(UserRole::Customer)
    }
}

/// A menu item. `item_type` comes back as TEXT (`type AS item_type`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub item_name: String,
    pub item_type: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
}

/// An order header: who, when, paid or not, and the running total
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i64,
    pub login: String,
    pub paid: bool,
    pub order_time: DateTime<Utc>,
    pub total: Decimal,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub order_id: i64,
    pub item_name: String,
    pub quantity: i32,
}

/// Input for a single order line before it has been priced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    pub item_name: String,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Customer, UserRole::Employee, UserRole::Manager] {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_is_staff() {
        assert!(!UserRole::Customer.is_staff());
        assert!(UserRole::Employee.is_staff());
        assert!(UserRole::Manager.is_staff());
    }

    #[test]
    fn test_unknown_role_falls_back_to_customer() {
        let user = User {
            login: "bob".to_string(),
            password: "hunter2".to_string(),
            phone_num: "".to_string(),
            fav_items: "".to_string(),
            role: "Wizard".to_string(),
        };
        assert_eq!(user.role(), UserRole::Customer);
    }
}
