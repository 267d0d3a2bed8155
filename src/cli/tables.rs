//! Table rendering for menu items and orders.

use crate::db::{MenuItem, Order, OrderLine};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MenuRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Type")]
    item_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Render menu items as a table
pub fn menu_table(items: &[MenuItem]) -> String {
    let rows: Vec<MenuRow> = items
        .iter()
        .map(|item| MenuRow {
            name: item.item_name.clone(),
            item_type: item.item_type.clone(),
            price: format!("${}", item.price),
            description: item.description.clone(),
        })
        .collect();

    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Order #")]
    id: i64,
    #[tabled(rename = "Login")]
    login: String,
    #[tabled(rename = "Placed")]
    placed: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Render order headers as a table
pub fn orders_table(orders: &[Order]) -> String {
    let rows: Vec<OrderRow> = orders
        .iter()
        .map(|order| OrderRow {
            id: order.order_id,
            login: order.login.clone(),
            placed: order.order_time.format("%Y-%m-%d %H:%M").to_string(),
            paid: if order.paid { "yes" } else { "no" }.to_string(),
            total: format!("${}", order.total),
        })
        .collect();

    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: i32,
}

/// Render the line items of one order
pub fn lines_table(lines: &[OrderLine]) -> String {
    let rows: Vec<LineRow> = lines
        .iter()
        .map(|line| LineRow {
            item: line.item_name.clone(),
            quantity: line.quantity,
        })
        .collect();

    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn test_menu_table_contains_items() {
        let items = vec![MenuItem {
            item_name: "Espresso".to_string(),
            item_type: "Coffee".to_string(),
            price: Decimal::new(350, 2),
            description: "double shot".to_string(),
            image_url: "".to_string(),
        }];

        let table = menu_table(&items);
        assert!(table.contains("Espresso"));
        assert!(table.contains("$3.50"));
        assert!(table.contains("Item"));
    }

    #[test]
    fn test_orders_table_paid_flag() {
        let orders = vec![Order {
            order_id: 7,
            login: "alice".to_string(),
            paid: true,
            order_time: Utc::now(),
            total: Decimal::new(825, 2),
        }];

        let table = orders_table(&orders);
        assert!(table.contains("alice"));
        assert!(table.contains("yes"));
        assert!(table.contains("$8.25"));
    }

    #[test]
    fn test_lines_table() {
        let lines = vec![OrderLine {
            order_id: 7,
            item_name: "Latte".to_string(),
            quantity: 2,
        }];

        let table = lines_table(&lines);
        assert!(table.contains("Latte"));
        assert!(table.contains('2'));
    }
}
