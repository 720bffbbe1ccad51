use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::CoreError;
use crate::store::{DocumentStore, StoreHandle, VersionCheck};
use crate::util::{retry_transient, RetryConfig};

use super::aggregate::{Cart, CartItem};

const CARTS: &str = "carts";

// ============================================================================
// Cart Service
// ============================================================================
//
// Load -> mutate -> conditional write, retried on conflict. A cart document
// is created implicitly by the first add and emptied (not deleted) when the
// customer checks out.
//
// ============================================================================

#[derive(Clone)]
pub struct CartService {
    store: StoreHandle,
    retry: RetryConfig,
}

impl CartService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_handle(StoreHandle::new(store), RetryConfig::default())
    }

    pub(crate) fn with_handle(store: StoreHandle, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// The customer's current cart; empty when none exists yet.
    pub async fn get(&self, ctx: &RequestContext) -> Result<Cart, CoreError> {
        let (cart, _version) = self.store.load(CARTS, &ctx.user_id).await?;
        Ok(cart)
    }

    pub async fn add_item(&self, ctx: &RequestContext, item: CartItem) -> Result<Cart, CoreError> {
        let cart = self
            .mutate(ctx, "cart add", |cart| cart.add_item(item.clone()))
            .await?;
        tracing::info!(
            customer_id = %ctx.user_id,
            correlation_id = %ctx.correlation_id,
            product_id = %item.product_id,
            quantity = item.quantity,
            "item added to cart"
        );
        Ok(cart)
    }

    pub async fn remove_item(
        &self,
        ctx: &RequestContext,
        product_id: &str,
    ) -> Result<Cart, CoreError> {
        self.mutate(ctx, "cart remove", |cart| cart.remove_item(product_id))
            .await
    }

    /// Remove the given products, leaving anything else in place.
    pub(crate) async fn remove_products(
        &self,
        ctx: &RequestContext,
        product_ids: &[String],
    ) -> Result<Cart, CoreError> {
        self.mutate(ctx, "cart remove products", |cart| {
            cart.remove_products(product_ids)
        })
        .await
    }

    pub async fn clear(&self, ctx: &RequestContext) -> Result<(), CoreError> {
        self.mutate(ctx, "cart clear", Cart::clear).await?;
        Ok(())
    }

    async fn mutate<F>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        apply: F,
    ) -> Result<Cart, CoreError>
    where
        F: Fn(&mut Cart),
    {
        let store = &self.store;
        let user_id = ctx.user_id.as_str();
        let apply = &apply;

        retry_transient(&self.retry, operation, move || async move {
            let (mut cart, version) = store.load::<Cart>(CARTS, user_id).await?;
            apply(&mut cart);

            let check = if version == 0 {
                VersionCheck::Absent
            } else {
                VersionCheck::Matches(version)
            };
            store.save(CARTS, user_id, &cart, check).await?;
            Ok(cart)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use rust_decimal_macros::dec;

    fn service(store: Arc<InMemoryStore>) -> CartService {
        CartService::with_handle(StoreHandle::new(store), RetryConfig::immediate(3))
    }

    fn item(product_id: &str, quantity: u32) -> CartItem {
        CartItem::new(product_id, "milk", "milk.png", "Dairy", "", dec!(1.20), quantity).unwrap()
    }

    #[tokio::test]
    async fn first_add_creates_the_cart() {
        let carts = service(Arc::new(InMemoryStore::new()));
        let ctx = RequestContext::customer("alice@example.com");

        let cart = carts.add_item(&ctx, item("p1", 2)).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(carts.get(&ctx).await.unwrap(), cart);
    }

    #[tokio::test]
    async fn re_adding_replaces_the_line() {
        let carts = service(Arc::new(InMemoryStore::new()));
        let ctx = RequestContext::customer("alice@example.com");

        carts.add_item(&ctx, item("p1", 2)).await.unwrap();
        let cart = carts.add_item(&ctx, item("p1", 7)).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 7);
    }

    #[tokio::test]
    async fn clear_empties_but_keeps_the_document() {
        let store = Arc::new(InMemoryStore::new());
        let carts = service(store.clone());
        let ctx = RequestContext::customer("alice@example.com");

        carts.add_item(&ctx, item("p1", 1)).await.unwrap();
        carts.clear(&ctx).await.unwrap();

        assert!(carts.get(&ctx).await.unwrap().is_empty());
        // Emptied, not deleted.
        let doc = crate::store::DocumentStore::get(store.as_ref(), CARTS, "alice@example.com")
            .await
            .unwrap();
        assert!(doc.is_some());
    }

    #[tokio::test]
    async fn carts_are_isolated_per_customer() {
        let carts = service(Arc::new(InMemoryStore::new()));
        let alice = RequestContext::customer("alice@example.com");
        let bob = RequestContext::customer("bob@example.com");

        carts.add_item(&alice, item("p1", 1)).await.unwrap();
        assert!(carts.get(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_adds_lose_nothing() {
        // Both mutations read the same cart version; the write delay forces
        // the overlap, and the losing writer must retry against the new
        // version instead of clobbering it.
        let store = Arc::new(InMemoryStore::with_write_delay(
            std::time::Duration::from_millis(25),
        ));
        let carts = service(store);
        let ctx = RequestContext::customer("alice@example.com");

        let (a, b) = tokio::join!(
            carts.add_item(&ctx, item("p1", 1)),
            carts.add_item(&ctx, item("p2", 2)),
        );
        a.unwrap();
        b.unwrap();

        let cart = carts.get(&ctx).await.unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[tokio::test]
    async fn transient_store_failure_is_retried() {
        let store = Arc::new(InMemoryStore::new());
        let carts = service(store.clone());
        let ctx = RequestContext::customer("alice@example.com");

        store.inject_transient_failures(2);
        let cart = carts.add_item(&ctx, item("p1", 1)).await.unwrap();
        assert_eq!(cart.items.len(), 1);
    }
}
