use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::store::{DocumentStore, StoreHandle, VersionCheck};

const USERS: &str = "users";

/// What a user can do in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Customer,
    DeliveryAgent,
    Admin,
}

/// Profile document stored per user, keyed by the user's stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub role: Role,
}

/// Fulfillment identity: a user profile in the delivery role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub contact: String,
}

impl UserProfile {
    pub fn as_agent(&self) -> Option<Agent> {
        (self.role == Role::DeliveryAgent).then(|| Agent {
            id: self.id.clone(),
            name: self.name.clone(),
            contact: self.contact.clone(),
        })
    }
}

/// Profile storage over the users collection.
///
/// Identity (credentials, sessions) lives with the external auth
/// collaborator; this only holds the profile documents the storefront needs
/// for display and for sourcing the delivery pool.
#[derive(Clone)]
pub struct UserDirectory {
    store: StoreHandle,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store: StoreHandle::new(store),
        }
    }

    pub(crate) fn with_handle(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Create a profile for a fresh account. Fails if the id is taken.
    pub async fn create_profile(&self, profile: &UserProfile) -> Result<(), CoreError> {
        if profile.id.trim().is_empty() {
            return Err(CoreError::validation("user id cannot be blank"));
        }
        if profile.name.trim().is_empty() {
            return Err(CoreError::validation("user name cannot be blank"));
        }

        match self
            .store
            .save(USERS, &profile.id, profile, VersionCheck::Absent)
            .await
        {
            Ok(_) => {
                tracing::info!(user_id = %profile.id, role = ?profile.role, "profile created");
                Ok(())
            }
            Err(CoreError::ConcurrencyConflict { .. }) => Err(CoreError::validation(format!(
                "user already exists: {}",
                profile.id
            ))),
            Err(err) => Err(err),
        }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, CoreError> {
        let (profile, _version) = self.store.require(USERS, user_id, "user").await?;
        Ok(profile)
    }

    /// Every profile, in stable key order (admin dashboard view).
    pub async fn list(&self) -> Result<Vec<UserProfile>, CoreError> {
        let profiles: Vec<(String, UserProfile)> = self.store.list_all(USERS).await?;
        Ok(profiles.into_iter().map(|(_, profile)| profile).collect())
    }

    /// Delete a profile. No-op when absent.
    pub async fn remove(&self, user_id: &str) -> Result<(), CoreError> {
        self.store.delete(USERS, user_id).await?;
        tracing::info!(user_id = %user_id, "profile removed");
        Ok(())
    }

    /// Every profile in the delivery role, in stable key order.
    pub async fn agents(&self) -> Result<Vec<Agent>, CoreError> {
        let role = serde_json::to_value(Role::DeliveryAgent)
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;
        let profiles: Vec<(String, UserProfile)> =
            self.store.query_by_field(USERS, "role", &role).await?;
        Ok(profiles
            .into_iter()
            .filter_map(|(_, profile)| profile.as_agent())
            .collect())
    }
}
