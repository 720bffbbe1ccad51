use std::sync::Arc;

use crate::error::CoreError;
use crate::store::{DocumentStore, StoreHandle, VersionCheck};

use super::PromoCode;

const PROMO_CODES: &str = "promo_codes";

/// Validates submitted codes against the promo reference collection and
/// carries the admin CRUD for it.
#[derive(Clone)]
pub struct PromoEngine {
    store: StoreHandle,
}

impl PromoEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store: StoreHandle::new(store),
        }
    }

    /// Look up a submitted code by exact match.
    ///
    /// A blank submission is a validation failure; an unknown code is
    /// `NotFound`. The caller applies the returned percentage to its total.
    pub async fn validate(&self, code: &str) -> Result<PromoCode, CoreError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CoreError::validation("promo code cannot be blank"));
        }

        let (promo, _version): (PromoCode, u64) =
            self.store.require(PROMO_CODES, code, "promo code").await?;
        tracing::debug!(code = %promo.code, percent_off = %promo.percent_off, "promo code validated");
        Ok(promo)
    }

    /// Create or replace a code. Reference data, so the write is
    /// unconditional.
    pub async fn upsert(&self, promo: &PromoCode) -> Result<(), CoreError> {
        self.store
            .save(PROMO_CODES, &promo.code, promo, VersionCheck::Any)
            .await?;
        tracing::info!(code = %promo.code, percent_off = %promo.percent_off, "promo code saved");
        Ok(())
    }

    pub async fn remove(&self, code: &str) -> Result<(), CoreError> {
        self.store.delete(PROMO_CODES, code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use rust_decimal_macros::dec;

    fn engine() -> PromoEngine {
        PromoEngine::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn known_code_validates() {
        let promos = engine();
        let promo = PromoCode::new("SAVE20", dec!(20)).unwrap();
        promos.upsert(&promo).await.unwrap();

        assert_eq!(promos.validate("SAVE20").await.unwrap(), promo);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let err = engine().validate("NOPE").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::NotFound {
                entity: "promo code",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn blank_code_is_a_validation_failure() {
        let err = engine().validate("   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn removed_code_stops_validating() {
        let promos = engine();
        promos
            .upsert(&PromoCode::new("SAVE5", dec!(5)).unwrap())
            .await
            .unwrap();
        promos.remove("SAVE5").await.unwrap();

        assert!(promos.validate("SAVE5").await.is_err());
    }
}
