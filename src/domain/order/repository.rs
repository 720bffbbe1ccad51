use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::error::CoreError;
use crate::store::{DocumentStore, StoreHandle, VersionCheck};
use crate::util::{retry_transient, RetryConfig};

use super::aggregate::Order;
use super::value_objects::OrderStatus;

const ORDERS: &str = "orders";

// ============================================================================
// Order Repository
// ============================================================================
//
// One document per order, keyed by order id, with customer and agent ids as
// plain fields so both views are store-native field queries. This replaces
// the storefront's original orders-as-array-in-one-customer-document layout,
// whose per-agent view was a full-collection scan and whose appends raced
// under read-modify-write.
//
// Status updates are still read-modify-write, guarded by the document
// version and retried on conflict.
//
// ============================================================================

#[derive(Clone)]
pub struct OrderRepository {
    store: StoreHandle,
    retry: RetryConfig,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_handle(StoreHandle::new(store), RetryConfig::default())
    }

    pub(crate) fn with_handle(store: StoreHandle, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// Persist a freshly created order. Order ids are unique, so this never
    /// contends with other writers; retries only cover transient outages.
    pub async fn insert(&self, order: Order) -> Result<Order, CoreError> {
        let store = &self.store;

        let persisted = retry_transient(&self.retry, "order insert", move || {
            let order = order.clone();
            async move {
                let key = order.order_id.to_string();
                store.save(ORDERS, &key, &order, VersionCheck::Absent).await?;
                Ok(order)
            }
        })
        .await?;

        tracing::info!(
            customer_id = %persisted.customer_id,
            order_id = %persisted.order_id,
            total = %persisted.total_amount,
            "order persisted"
        );
        Ok(persisted)
    }

    pub async fn get(&self, order_id: Uuid) -> Result<Order, CoreError> {
        let (order, _version) = self
            .store
            .require(ORDERS, &order_id.to_string(), "order")
            .await?;
        Ok(order)
    }

    /// The customer's full order history, oldest first. No pagination.
    pub async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, CoreError> {
        self.query("customer_id", customer_id).await
    }

    /// Every order assigned to the given agent, oldest first.
    pub async fn orders_for_agent(&self, agent_id: &str) -> Result<Vec<Order>, CoreError> {
        self.query("assigned_agent_id", agent_id).await
    }

    async fn query(&self, field: &str, value: &str) -> Result<Vec<Order>, CoreError> {
        let matches: Vec<(String, Order)> = self
            .store
            .query_by_field(ORDERS, field, &json!(value))
            .await?;
        let mut orders: Vec<Order> = matches.into_iter().map(|(_, order)| order).collect();
        orders.sort_by(|a, b| (a.created_at, a.order_id).cmp(&(b.created_at, b.order_id)));
        Ok(orders)
    }

    /// Move one order to `new_status` on behalf of `acting_agent`.
    ///
    /// Only the assigned agent may transition an order. A request for the
    /// status the order already has commits nothing and succeeds, so retries
    /// of a Delivered confirmation are safe.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        acting_agent: &str,
    ) -> Result<Order, CoreError> {
        let store = &self.store;

        let updated = retry_transient(&self.retry, "order status update", move || async move {
            let key = order_id.to_string();
            let (mut order, version): (Order, u64) =
                store.require(ORDERS, &key, "order").await?;

            if order.assigned_agent_id.as_deref() != Some(acting_agent) {
                return Err(CoreError::validation(
                    "order is not assigned to this agent",
                ));
            }

            let changed = order.transition(new_status)?;
            if changed {
                store
                    .save(ORDERS, &key, &order, VersionCheck::Matches(version))
                    .await?;
            }
            Ok(order)
        })
        .await?;

        tracing::info!(
            order_id = %order_id,
            status = ?updated.status,
            agent_id = %acting_agent,
            "order status updated"
        );
        Ok(updated)
    }
}
