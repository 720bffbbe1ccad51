use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::promo;
use crate::error::CoreError;

use super::value_objects::OrderStatus;

// ============================================================================
// Order Aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Uuid,
    pub customer_id: String,
    /// Copy of the cart lines at checkout time. Never mutated afterwards.
    pub items: Vec<CartItem>,
    /// Fixed at creation; never recomputed from live prices.
    pub total_amount: Decimal,
    pub shipping_address: String,
    /// Set once by the assignment policy during checkout.
    pub assigned_agent_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart into a new pending order.
    ///
    /// The total is the cart total with the optional percentage discount
    /// already applied; it stays fixed for the life of the order.
    pub fn from_cart(
        customer_id: impl Into<String>,
        cart: &Cart,
        shipping_address: &str,
        discount_percent: Option<Decimal>,
    ) -> Result<Self, CoreError> {
        if cart.is_empty() {
            return Err(CoreError::validation("cannot check out an empty cart"));
        }
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CoreError::validation("shipping address cannot be blank"));
        }

        let total_amount = match discount_percent {
            Some(percent) => {
                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(CoreError::validation(
                        "discount percentage must be between 0 and 100",
                    ));
                }
                promo::apply_discount(cart.total(), percent)
            }
            None => cart.total(),
        };

        Ok(Self {
            order_id: Uuid::new_v4(),
            customer_id: customer_id.into(),
            items: cart.items.clone(),
            total_amount,
            shipping_address: shipping_address.to_string(),
            assigned_agent_id: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Move the order to `next`.
    ///
    /// Returns whether anything changed: asking for the current status is a
    /// no-op `Ok(false)`, so a retried Delivered request does not fail.
    /// Anything other than Pending -> Delivered is rejected.
    pub fn transition(&mut self, next: OrderStatus) -> Result<bool, CoreError> {
        match (self.status, next) {
            (current, next) if current == next => Ok(false),
            (OrderStatus::Pending, OrderStatus::Delivered) => {
                self.status = OrderStatus::Delivered;
                Ok(true)
            }
            (from, to) => Err(CoreError::InvalidTransition { from, to }),
        }
    }
}
