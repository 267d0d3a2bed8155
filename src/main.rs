// cafe-cli - runs a café's users, menu, and orders from the terminal
//
// This is the main entry point. Parses connection args, connects to
// PostgreSQL, and hands off to the interactive menu loop.

use cafe_cli_lib::{
    cli::{menus::Menus, Cli},
    Database,
};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Password};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).init();

    // PGPASSWORD / --password wins; otherwise ask, hidden
    let password = match &args.password {
        Some(p) => p.clone(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Password for {}", args.user))
            .allow_empty_password(true)
            .interact()?,
    };

    println!(
        "Connecting to database {} at {}:{}...",
        args.dbname, args.host, args.port
    );

    let db = match Database::connect(&args.database_url(&password)).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Unable to connect to database: {}", e.user_message());
            eprintln!("Make sure PostgreSQL is running on {}:{}", args.host, args.port);
            std::process::exit(1);
        }
    };

    let stats = db.stats().await?;
    info!(
        users = stats.total_users,
        items = stats.total_items,
        orders = stats.total_orders,
        "connected"
    );
    println!("Done\n");

    let db = Arc::new(db);
    let result = Menus::new(Arc::clone(&db)).run().await;

    println!("Disconnecting from database...");
    db.close().await;
    println!("Done\n\nBye!");

    result?;
    Ok(())
}
