use async_trait::async_trait;

// ============================================================================
// Identity Collaborator
// ============================================================================
//
// Authentication lives entirely with the hosted identity provider; the core
// only needs a stable user id back from it. No credentials or sessions are
// stored in this crate.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// External auth collaborator. Implementations return the stable user id
/// used to key carts, order history, and profiles.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credential: &Credential) -> Result<String, IdentityError>;

    async fn create_account(&self, credential: &Credential) -> Result<String, IdentityError>;

    async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;
}
