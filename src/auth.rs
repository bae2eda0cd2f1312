/// An authenticated operator.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub operator_id: String,
    pub email: String,
}

/// Sign-in failures. The display text is shown inline on the login screen.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Sign-in unavailable: {0}")]
    Unavailable(String),
}

/// Reject an empty form before it reaches the store.
pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Store};

    #[test]
    fn empty_fields_are_rejected() {
        assert_eq!(validate_login("", "secret"), Err(AuthError::MissingCredentials));
        assert_eq!(validate_login("operator@canti.os", ""), Err(AuthError::MissingCredentials));
        assert!(validate_login("operator@canti.os", "secret").is_ok());
    }

    #[tokio::test]
    async fn memory_store_accepts_only_its_operator() {
        let store = MemoryStore::new().with_operator("operator@canti.os", "studio");

        let session = store.sign_in("operator@canti.os", "studio").await.unwrap();
        assert_eq!(session.email, "operator@canti.os");

        let err = store.sign_in("operator@canti.os", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
