// Account management: sign up, log in, profile edits, role changes
//
// Role checks live here so the database layer never has to guess who is
// asking.

use crate::db::{Database, UserRole};
use crate::error::{CafeError, Result};
use std::sync::Arc;

// The schema stores these as unbounded TEXT, but nobody needs a 10KB login.
const MAX_LOGIN_LENGTH: usize = 50;
const MAX_PASSWORD_LENGTH: usize = 50;
const MAX_PHONE_LENGTH: usize = 30;

/// An authenticated user: who they are and what they may do
#[derive(Debug, Clone)]
pub struct Session {
    pub login: String,
    pub role: UserRole,
}

impl Session {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }
}

pub struct Accounts {
    db: Arc<Database>,
}

impl Accounts {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a new customer account
    pub async fn sign_up(&self, login: &str, password: &str, phone_num: &str) -> Result<()> {
        let login = validate_login(login)?;
        let password = validate_password(password)?;

        if phone_num.len() > MAX_PHONE_LENGTH {
            return Err(CafeError::InputTooLong(MAX_PHONE_LENGTH));
        }

        self.db.create_user(login, password, phone_num.trim()).await
    }

    /// Check credentials and open a session
    pub async fn log_in(&self, login: &str, password: &str) -> Result<Session> {
        let user = self
            .db
            .check_credentials(login.trim(), password)
            .await?
            .ok_or(CafeError::InvalidCredentials)?;

        let role = user.role();
        Ok(Session {
            login: user.login,
            role,
        })
    }

    /// Change the session user's own password
    pub async fn change_password(&self, session: &Session, new_password: &str) -> Result<()> {
        let new_password = validate_password(new_password)?;
        self.db.update_password(&session.login, new_password).await
    }

    /// Change the session user's own phone number
    pub async fn change_phone(&self, session: &Session, new_phone: &str) -> Result<()> {
        if new_phone.len() > MAX_PHONE_LENGTH {
            return Err(CafeError::InputTooLong(MAX_PHONE_LENGTH));
        }
        self.db.update_phone(&session.login, new_phone.trim()).await
    }

    /// Change the session user's own favorite items
    pub async fn change_fav_items(&self, session: &Session, fav_items: &str) -> Result<()> {
        self.db
            .update_fav_items(&session.login, fav_items.trim())
            .await
    }

    /// Promote or demote another user. Managers only.
    pub async fn change_role(
        &self,
        session: &Session,
        target_login: &str,
        new_role: UserRole,
    ) -> Result<()> {
        require_manager(session, "change user types")?;

        self.db.update_role(target_login.trim(), new_role).await
    }
}

/// Check that the session belongs to a manager
pub(crate) fn require_manager(session: &Session, action: &str) -> Result<()> {
    if session.is_manager() {
        Ok(())
    } else {
        Err(CafeError::NotAuthorized(action.to_string()))
    }
}

fn validate_login(login: &str) -> Result<&str> {
    let trimmed = login.trim();
    if trimmed.is_empty() {
        return Err(CafeError::InvalidInput("login cannot be empty".to_string()));
    }
    if trimmed.len() > MAX_LOGIN_LENGTH {
        return Err(CafeError::InputTooLong(MAX_LOGIN_LENGTH));
    }
    Ok(trimmed)
}

fn validate_password(password: &str) -> Result<&str> {
    if password.is_empty() {
        return Err(CafeError::InvalidInput(
            "password cannot be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(CafeError::InputTooLong(MAX_PASSWORD_LENGTH));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Session {
        Session {
            login: "alice".to_string(),
            role: UserRole::Customer,
        }
    }

    fn manager() -> Session {
        Session {
            login: "boss".to_string(),
            role: UserRole::Manager,
        }
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("alice").is_ok());
        assert_eq!(validate_login("  alice  ").unwrap(), "alice");

        assert!(matches!(
            validate_login("   "),
            Err(CafeError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_login(&"x".repeat(51)),
            Err(CafeError::InputTooLong(_))
        ));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter2").is_ok());
        assert!(matches!(
            validate_password(""),
            Err(CafeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_require_manager() {
        assert!(require_manager(&manager(), "edit the menu").is_ok());

        let err = require_manager(&customer(), "edit the menu").unwrap_err();
        assert!(matches!(err, CafeError::NotAuthorized(_)));
    }

    #[test]
    fn test_session_roles() {
        assert!(!customer().is_staff());
        assert!(manager().is_staff());
        assert!(manager().is_manager());

        let employee = Session {
            login: "eve".to_string(),
            role: UserRole::Employee,
        };
        assert!(employee.is_staff());
        assert!(!employee.is_manager());
    }
}
