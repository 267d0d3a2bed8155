/// SQL queries for user accounts
///
/// All queries use bind parameters; nothing here ever splices user input
/// into SQL text.

use crate::db::models::{User, UserRole};
use crate::db::Database;
use crate::error::{CafeError, Result};

impl Database {
    /// Create a new user account
    ///
    /// New accounts always start as Customer with no favorite items.
    ///
    /// # Returns
    /// * `Ok(())` - Account created
    /// * `Err(CafeError::LoginTaken)` - If the login already exists
    pub async fn create_user(&self, login: &str, password: &str, phone_num: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (login, password, phone_num, fav_items, type)
            VALUES ($1, $2, $3, '', 'Customer')
            "#,
        )
        .bind(login)
        .bind(password)
        .bind(phone_num)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                Err(CafeError::LoginTaken(login.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by login
    pub async fn find_user(&self, login: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT login, password, phone_num, fav_items, type AS role FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    /// Find the user matching a login/password pair
    ///
    /// Returns `None` when either the login doesn't exist or the password
    /// doesn't match; callers can't tell which, on purpose.
    pub async fn check_credentials(&self, login: &str, password: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT login, password, phone_num, fav_items, type AS role
            FROM users
            WHERE login = $1 AND password = $2
            "#,
        )
        .bind(login)
        .bind(password)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    /// Change a user's password
    pub async fn update_password(&self, login: &str, new_password: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password = $1 WHERE login = $2")
            .bind(new_password)
            .bind(login)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Change a user's phone number
    pub async fn update_phone(&self, login: &str, new_phone: &str) -> Result<()> {
        sqlx::query("UPDATE users SET phone_num = $1 WHERE login = $2")
            .bind(new_phone)
            .bind(login)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Change a user's favorite items
    pub async fn update_fav_items(&self, login: &str, fav_items: &str) -> Result<()> {
        sqlx::query("UPDATE users SET fav_items = $1 WHERE login = $2")
            .bind(fav_items)
            .bind(login)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Change a user's role
    ///
    /// # Returns
    /// * `Err(CafeError::UserNotFound)` - If no such login exists
    pub async fn update_role(&self, login: &str, role: UserRole) -> Result<()> {
        let result = sqlx::query("UPDATE users SET type = $1 WHERE login = $2")
            .bind(role.as_str())
            .bind(login)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CafeError::UserNotFound(login.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // All tests here need a running PostgreSQL; run with:
    //   CAFE_TEST_DATABASE_URL=postgres://... cargo test -- --ignored

    async fn setup() -> Database {
        Database::new_test().await.unwrap()
    }

    fn unique_login(prefix: &str) -> String {
        // Keep test accounts from colliding across runs
        format!("{}_{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap())
    }

    #[tokio::test]
    #[ignore]
    async fn test_create_and_find_user() {
        let db = setup().await;
        let login = unique_login("alice");

        db.create_user(&login, "secret", "555-0100").await.unwrap();

        let user = db.find_user(&login).await.unwrap().unwrap();
        assert_eq!(user.login, login);
        assert_eq!(user.role(), UserRole::Customer);
        assert_eq!(user.fav_items, "");
    }

    #[tokio::test]
    #[ignore]
    async fn test_duplicate_login_rejected() {
        let db = setup().await;
        let login = unique_login("bob");

        db.create_user(&login, "secret", "").await.unwrap();
        let err = db.create_user(&login, "other", "").await.unwrap_err();

        assert!(matches!(err, CafeError::LoginTaken(_)));
    }

    #[tokio::test]
    #[ignore]
    async fn test_check_credentials() {
        let db = setup().await;
        let login = unique_login("carol");

        db.create_user(&login, "secret", "").await.unwrap();

        let ok = db.check_credentials(&login, "secret").await.unwrap();
        assert!(ok.is_some());

        let bad = db.check_credentials(&login, "wrong").await.unwrap();
        assert!(bad.is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_role() {
        let db = setup().await;
        let login = unique_login("dave");

        db.create_user(&login, "secret", "").await.unwrap();
        db.update_role(&login, UserRole::Manager).await.unwrap();

        let user = db.find_user(&login).await.unwrap().unwrap();
        assert_eq!(user.role(), UserRole::Manager);

        let err = db.update_role("no_such_user", UserRole::Employee).await;
        assert!(matches!(err, Err(CafeError::UserNotFound(_))));
    }
}
