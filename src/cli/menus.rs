//! The interactive two-level menu loop.
//!
//! Mirrors the classic console flow: a pre-login menu (create user / log in)
//! and a per-session menu (browse, profile, orders). Every operation error is
//! printed and the loop keeps going; one bad input never kills the session.

use crate::cli::tables;
use crate::core::{Accounts, Catalog, OrderDesk, Session};
use crate::db::{Database, LineInput, MenuItem, UserRole};
use crate::error::{CafeError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

pub struct Menus {
    accounts: Accounts,
    catalog: Catalog,
    desk: OrderDesk,
}

impl Menus {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            accounts: Accounts::new(Arc::clone(&db)),
            catalog: Catalog::new(Arc::clone(&db)),
            desk: OrderDesk::new(db),
        }
    }

    /// Top-level loop: runs until the user picks Exit
    pub async fn run(&self) -> Result<()> {
        loop {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("MAIN MENU")
                .items(&["Create user", "Log in", "Exit"])
                .default(0)
                .interact()?;

            match choice {
                0 => report(self.create_user().await),
                1 => match self.log_in().await {
                    Ok(session) => {
                        info!(login = %session.login, role = %session.role, "logged in");
                        self.user_menu(&session).await?;
                    }
                    Err(e) => eprintln!("{}", e.user_message()),
                },
                _ => break,
            }
        }

        Ok(())
    }

    async fn create_user(&self) -> Result<()> {
        let theme = ColorfulTheme::default();

        let login: String = Input::with_theme(&theme)
            .with_prompt("Enter user login")
            .interact_text()?;
        let password = Password::with_theme(&theme)
            .with_prompt("Enter user password")
            .interact()?;
        let phone: String = Input::with_theme(&theme)
            .with_prompt("Enter user phone")
            .allow_empty(true)
            .interact_text()?;

        self.accounts.sign_up(&login, &password, &phone).await?;
        println!("User successfully created!");
        Ok(())
    }

    async fn log_in(&self) -> Result<Session> {
        let theme = ColorfulTheme::default();

        let login: String = Input::with_theme(&theme)
            .with_prompt("Enter user login")
            .interact_text()?;
        let password = Password::with_theme(&theme)
            .with_prompt("Enter user password")
            .interact()?;

        self.accounts.log_in(&login, &password).await
    }

    /// Per-session loop: runs until the user logs out
    async fn user_menu(&self, session: &Session) -> Result<()> {
        loop {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Signed in as {} ({})", session.login, session.role))
                .items(&[
                    "Browse menu",
                    "Update profile",
                    "Place an order",
                    "Update an order",
                    "Log out",
                ])
                .default(0)
                .interact()?;

            match choice {
                0 => report(self.browse_menu(session).await),
                1 => report(self.profile_menu(session).await),
                2 => report(self.place_order(session).await),
                3 => report(self.update_order(session).await),
                _ => break,
            }
        }

        Ok(())
    }

    // ----- menu browsing and editing -----

    async fn browse_menu(&self, session: &Session) -> Result<()> {
        let items = self.catalog.all_items().await?;
        if items.is_empty() {
            println!("The menu is empty.");
        } else {
            println!("{}", tables::menu_table(&items));
        }

        loop {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Menu")
                .items(&["Search by name", "Search by type", "Edit menu", "Back"])
                .default(3)
                .interact()?;

            match choice {
                0 => report(self.search_by_name().await),
                1 => report(self.search_by_type().await),
                2 => report(self.edit_menu(session).await),
                _ => break,
            }
        }

        Ok(())
    }

    async fn search_by_name(&self) -> Result<()> {
        let name: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Item name")
            .interact_text()?;

        let item = self.catalog.search_by_name(&name).await?;
        println!("{}", tables::menu_table(std::slice::from_ref(&item)));
        Ok(())
    }

    async fn search_by_type(&self) -> Result<()> {
        let item_type: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Item type (e.g. Coffee, Tea)")
            .interact_text()?;

        let items = self.catalog.search_by_type(&item_type).await?;
        if items.is_empty() {
            println!("No items of type '{}'", item_type.trim());
        } else {
            println!("{}", tables::menu_table(&items));
        }
        Ok(())
    }

    async fn edit_menu(&self, session: &Session) -> Result<()> {
        // The catalog checks the manager gate again on every write; this is
        // just to fail fast before asking a cashier five questions.
        if !session.is_manager() {
            return Err(CafeError::NotAuthorized("edit the menu".to_string()));
        }

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Edit menu")
            .items(&["Add item", "Delete item", "Update item", "Back"])
            .default(3)
            .interact()?;

        match choice {
            0 => self.add_menu_item(session).await,
            1 => self.delete_menu_item(session).await,
            2 => self.update_menu_item(session).await,
            _ => Ok(()),
        }
    }

    async fn add_menu_item(&self, session: &Session) -> Result<()> {
        let theme = ColorfulTheme::default();

        let name: String = Input::with_theme(&theme)
            .with_prompt("Item name")
            .interact_text()?;
        let item_type: String = Input::with_theme(&theme)
            .with_prompt("Item type")
            .interact_text()?;
        let price: Decimal = Input::with_theme(&theme)
            .with_prompt("Price")
            .interact_text()?;
        let description: String = Input::with_theme(&theme)
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?;
        let image_url: String = Input::with_theme(&theme)
            .with_prompt("Image URL")
            .allow_empty(true)
            .interact_text()?;

        self.catalog
            .add_item(session, &name, &item_type, price, &description, &image_url)
            .await?;
        println!("Item added to the menu.");
        Ok(())
    }

    async fn delete_menu_item(&self, session: &Session) -> Result<()> {
        let name: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Item name to delete")
            .interact_text()?;

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete '{}' from the menu?", name.trim()))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }

        self.catalog.remove_item(session, &name).await?;
        println!("Item deleted.");
        Ok(())
    }

    async fn update_menu_item(&self, session: &Session) -> Result<()> {
        let theme = ColorfulTheme::default();

        let name: String = Input::with_theme(&theme)
            .with_prompt("Item name to update")
            .interact_text()?;

        let field = Select::with_theme(&theme)
            .with_prompt("Field to change")
            .items(&["Name", "Type", "Price", "Description", "Image URL"])
            .default(0)
            .interact()?;

        match field {
            0 => {
                let new_name: String = Input::with_theme(&theme)
                    .with_prompt("New name")
                    .interact_text()?;
                self.catalog.rename_item(session, &name, &new_name).await?;
            }
            1 => {
                let new_type: String = Input::with_theme(&theme)
                    .with_prompt("New type")
                    .interact_text()?;
                self.catalog.set_item_type(session, &name, &new_type).await?;
            }
            2 => {
                let price: Decimal = Input::with_theme(&theme)
                    .with_prompt("New price")
                    .interact_text()?;
                self.catalog.set_price(session, &name, price).await?;
            }
            3 => {
                let description: String = Input::with_theme(&theme)
                    .with_prompt("New description")
                    .allow_empty(true)
                    .interact_text()?;
                self.catalog
                    .set_description(session, &name, &description)
                    .await?;
            }
            _ => {
                let url: String = Input::with_theme(&theme)
                    .with_prompt("New image URL")
                    .allow_empty(true)
                    .interact_text()?;
                self.catalog.set_image_url(session, &name, &url).await?;
            }
        }

        println!("Item updated.");
        Ok(())
    }

    // ----- profile -----

    async fn profile_menu(&self, session: &Session) -> Result<()> {
        loop {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Update profile")
                .items(&[
                    "Change password",
                    "Change phone number",
                    "Change favorite items",
                    "Change a user's type",
                    "Back",
                ])
                .default(4)
                .interact()?;

            match choice {
                0 => report(self.change_password(session).await),
                1 => report(self.change_phone(session).await),
                2 => report(self.change_fav_items(session).await),
                3 => report(self.change_user_type(session).await),
                _ => break,
            }
        }

        Ok(())
    }

    async fn change_password(&self, session: &Session) -> Result<()> {
        let new_password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("New password")
            .with_confirmation("Repeat new password", "Passwords don't match")
            .interact()?;

        self.accounts.change_password(session, &new_password).await?;
        println!("Password changed.");
        Ok(())
    }

    async fn change_phone(&self, session: &Session) -> Result<()> {
        let phone: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("New phone number")
            .allow_empty(true)
            .interact_text()?;

        self.accounts.change_phone(session, &phone).await?;
        println!("Phone number changed.");
        Ok(())
    }

    async fn change_fav_items(&self, session: &Session) -> Result<()> {
        let fav: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("New favorite items")
            .allow_empty(true)
            .interact_text()?;

        self.accounts.change_fav_items(session, &fav).await?;
        println!("Favorite items changed.");
        Ok(())
    }

    async fn change_user_type(&self, session: &Session) -> Result<()> {
        let theme = ColorfulTheme::default();

        let target: String = Input::with_theme(&theme)
            .with_prompt("Login of the user to change")
            .interact_text()?;

        let role = Select::with_theme(&theme)
            .with_prompt("New type")
            .items(&PROMOTION_ROLES)
            .default(0)
            .interact()?;

        let new_role = promotion_role(role);

        self.accounts.change_role(session, &target, new_role).await?;
        println!("User type changed to {}.", new_role);
        Ok(())
    }

    // ----- orders -----

    async fn place_order(&self, session: &Session) -> Result<()> {
        self.show_history(session).await?;

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Place a new order?")
            .default(true)
            .interact()?;
        if !confirmed {
            return Ok(());
        }

        let mut lines: Vec<LineInput> = Vec::new();
        loop {
            let theme = ColorfulTheme::default();

            // Check each name against the menu right away; a typo costs one
            // re-prompt, not the whole order.
            let item = match self.prompt_menu_item(&theme).await? {
                Some(item) => item,
                None => {
                    let retry = Confirm::with_theme(&theme)
                        .with_prompt("Try another name?")
                        .default(true)
                        .interact()?;
                    if retry {
                        continue;
                    }
                    break;
                }
            };

            let quantity = prompt_quantity(&theme)?;

            lines.push(LineInput {
                item_name: item.item_name,
                quantity,
            });

            let more = Confirm::with_theme(&theme)
                .with_prompt("Add another item?")
                .default(false)
                .interact()?;
            if !more {
                break;
            }
        }

        let (order_id, total) = self.desk.place(session, &lines).await?;
        println!("Order #{} placed. Total: ${}", order_id, total);
        Ok(())
    }

    async fn update_order(&self, session: &Session) -> Result<()> {
        self.show_history(session).await?;

        let order_id: i64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Order #")
            .interact_text()?;

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Order #{}", order_id))
            .items(&["View details", "Add an item", "Mark as paid", "Back"])
            .default(3)
            .interact()?;

        match choice {
            0 => {
                let (order, lines) = self.desk.order_details(session, order_id).await?;
                println!("{}", tables::orders_table(std::slice::from_ref(&order)));
                if !lines.is_empty() {
                    println!("{}", tables::lines_table(&lines));
                }
            }
            1 => {
                let theme = ColorfulTheme::default();
                let item = match self.prompt_menu_item(&theme).await? {
                    Some(item) => item,
                    None => return Ok(()),
                };
                let quantity = prompt_quantity(&theme)?;

                let new_total = self
                    .desk
                    .add_to_order(
                        session,
                        order_id,
                        &LineInput {
                            item_name: item.item_name,
                            quantity,
                        },
                    )
                    .await?;
                println!("Order #{} updated. New total: ${}", order_id, new_total);
            }
            2 => {
                self.desk.mark_paid(session, order_id).await?;
                println!("Order #{} marked as paid.", order_id);
            }
            _ => {}
        }

        Ok(())
    }

    /// Ask for an item name and look it up on the menu
    ///
    /// Returns `None` when the name isn't on the menu, after telling the
    /// user, so callers can re-prompt instead of failing later.
    async fn prompt_menu_item(&self, theme: &ColorfulTheme) -> Result<Option<MenuItem>> {
        let item_name: String = Input::with_theme(theme)
            .with_prompt("Item name")
            .interact_text()?;

        match self.catalog.search_by_name(&item_name).await {
            Ok(item) => Ok(Some(item)),
            Err(e @ CafeError::ItemNotFound(_)) => {
                eprintln!("{}", e.user_message());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn show_history(&self, session: &Session) -> Result<()> {
        let orders = self.desk.history(session).await?;

        if session.is_staff() {
            println!("Orders from the last 24 hours:");
        } else {
            println!("Your recent orders:");
        }

        if orders.is_empty() {
            println!("  (none)");
        } else {
            println!("{}", tables::orders_table(&orders));
        }

        Ok(())
    }
}

/// Print an operation error without leaving the menu loop
fn report(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("{}", e.user_message());
    }
}

/// Roles a manager can assign; accounts start as Customer and don't go back
const PROMOTION_ROLES: [&str; 2] = ["Employee", "Manager"];

fn promotion_role(choice: usize) -> UserRole {
    match choice {
        0 => UserRole::Employee,
        _ => UserRole::Manager,
    }
}

/// Ask for a quantity; anything below 1 is rejected at the prompt
fn prompt_quantity(theme: &ColorfulTheme) -> Result<i32> {
    let quantity = Input::with_theme(theme)
        .with_prompt("Quantity")
        .default(1)
        .validate_with(|q: &i32| {
            if *q >= 1 {
                Ok(())
            } else {
                Err("quantity must be at least 1")
            }
        })
        .interact_text()?;

    Ok(quantity)
}
