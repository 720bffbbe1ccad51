use uuid::Uuid;

use crate::domain::user::Role;

/// Request-scoped identity for a single service call.
///
/// The acting user and correlation id are passed explicitly into every
/// operation instead of living in ambient shared state, so concurrent
/// requests for different users never observe each other.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Stable user identifier (account email or UID).
    pub user_id: String,
    pub role: Role,
    /// Groups log lines emitted on behalf of one request.
    pub correlation_id: Uuid,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            correlation_id: Uuid::new_v4(),
        }
    }

    pub fn customer(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Customer)
    }

    pub fn agent(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::DeliveryAgent)
    }
}
