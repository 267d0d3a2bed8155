/// Core services for cafe-cli
///
/// Service structs sit between the CLI menus and the database layer:
/// validation and authorization happen here, SQL happens in `db`.

pub mod accounts;
pub mod catalog;
pub mod orders;

pub use accounts::{Accounts, Session};
pub use catalog::Catalog;
pub use orders::OrderDesk;
