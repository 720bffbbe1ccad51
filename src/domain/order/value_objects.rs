use serde::{Deserialize, Serialize};

/// Fulfillment state of an order.
///
/// `Pending` is initial; `Delivered` is terminal. The only legal transition
/// is Pending -> Delivered, triggered by the assigned agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Delivered,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        self == Self::Delivered
    }
}
