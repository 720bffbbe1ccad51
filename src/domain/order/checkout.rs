use std::sync::Arc;

use rust_decimal::Decimal;

use crate::assignment::{AgentPool, AssignmentPolicy, FirstAvailable};
use crate::context::RequestContext;
use crate::domain::cart::CartService;
use crate::error::CoreError;
use crate::store::{DocumentStore, StoreHandle};
use crate::util::RetryConfig;

use super::aggregate::Order;
use super::repository::OrderRepository;

// ============================================================================
// Checkout
// ============================================================================
//
// Moves a cart into the order history: validate, snapshot, discount, assign
// an agent, persist, then clear the checked-out lines from the cart. The
// cart is touched only after the order document write commits, so a failed
// persist never loses the cart.
//
// ============================================================================

pub struct CheckoutService {
    carts: CartService,
    orders: OrderRepository,
    agents: AgentPool,
}

impl CheckoutService {
    /// Checkout with the observed first-available assignment policy.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_policy(store, Arc::new(FirstAvailable))
    }

    pub fn with_policy(store: Arc<dyn DocumentStore>, policy: Arc<dyn AssignmentPolicy>) -> Self {
        let handle = StoreHandle::new(store);
        Self::assemble(handle, RetryConfig::default(), policy)
    }

    pub(crate) fn assemble(
        handle: StoreHandle,
        retry: RetryConfig,
        policy: Arc<dyn AssignmentPolicy>,
    ) -> Self {
        let directory = crate::domain::user::UserDirectory::with_handle(handle.clone());
        Self {
            carts: CartService::with_handle(handle.clone(), retry.clone()),
            orders: OrderRepository::with_handle(handle, retry),
            agents: AgentPool::new(directory, policy),
        }
    }

    /// Place an order from the customer's current cart.
    ///
    /// `discount_percent` comes from a previously validated promo code; the
    /// cart total is discounted once, at snapshot time. Fails without side
    /// effects when the cart is empty, the address is blank, or no delivery
    /// agent exists. Items added to the cart while checkout is in flight
    /// survive the post-checkout clear.
    pub async fn checkout(
        &self,
        ctx: &RequestContext,
        shipping_address: &str,
        discount_percent: Option<Decimal>,
    ) -> Result<Order, CoreError> {
        let cart = self.carts.get(ctx).await?;
        let mut order =
            Order::from_cart(ctx.user_id.as_str(), &cart, shipping_address, discount_percent)?;

        // Assignment must succeed before anything is persisted; an empty
        // pool aborts the checkout with no dangling order.
        let agent = self.agents.assign().await?;
        order.assigned_agent_id = Some(agent.id.clone());

        let order = self.orders.insert(order).await?;

        let checked_out: Vec<String> = cart
            .items
            .iter()
            .map(|item| item.product_id.clone())
            .collect();
        self.carts.remove_products(ctx, &checked_out).await?;

        tracing::info!(
            customer_id = %ctx.user_id,
            correlation_id = %ctx.correlation_id,
            order_id = %order.order_id,
            agent_id = %agent.id,
            total = %order.total_amount,
            "✅ order placed"
        );
        Ok(order)
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }
}
