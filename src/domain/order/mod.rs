// ============================================================================
// Order Domain - Checkout Snapshot and Fulfillment Lifecycle
// ============================================================================
//
// An order is an immutable-item snapshot of a cart taken at checkout. Its
// only mutable pieces are the agent assignment (set once, at checkout) and
// the status, which moves Pending -> Delivered exactly once.
//
// ============================================================================

pub mod aggregate;
pub mod checkout;
pub mod repository;
pub mod value_objects;

pub use aggregate::Order;
pub use checkout::CheckoutService;
pub use repository::OrderRepository;
pub use value_objects::OrderStatus;
