use crate::domain::order::OrderStatus;
use crate::store::StoreError;

// ============================================================================
// Core Error Taxonomy
// ============================================================================
//
// Every operation in this crate fails with one of these variants. Transient
// variants (conflicts, timeouts, store outages) are retried by the repository
// layer before surfacing; the rest propagate to the caller immediately.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("no delivery agent available")]
    NoAgentAvailable,

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("concurrent update conflict: expected version {expected}, found {actual}")]
    ConcurrencyConflict { expected: u64, actual: u64 },

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Whether a bounded retry is worth attempting.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyConflict { .. } | Self::Timeout { .. } | Self::StoreUnavailable(_)
        )
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { expected, actual } => {
                Self::ConcurrencyConflict { expected, actual }
            }
            StoreError::Unavailable(message) => Self::StoreUnavailable(message),
            StoreError::Corrupt {
                collection,
                key,
                message,
            } => Self::StoreUnavailable(format!(
                "corrupt document in {}/{}: {}",
                collection, key, message
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(CoreError::ConcurrencyConflict {
            expected: 1,
            actual: 2
        }
        .is_transient());
        assert!(CoreError::Timeout { operation: "get" }.is_transient());
        assert!(CoreError::StoreUnavailable("down".into()).is_transient());

        assert!(!CoreError::validation("bad input").is_transient());
        assert!(!CoreError::not_found("order", "abc").is_transient());
        assert!(!CoreError::NoAgentAvailable.is_transient());
        assert!(!CoreError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        }
        .is_transient());
    }

    #[test]
    fn store_conflict_maps_to_concurrency_conflict() {
        let err: CoreError = StoreError::Conflict {
            expected: 3,
            actual: 4,
        }
        .into();
        assert!(matches!(
            err,
            CoreError::ConcurrencyConflict {
                expected: 3,
                actual: 4
            }
        ));
    }
}
