// ============================================================================
// Cart Domain - Pre-Purchase Item Selection
// ============================================================================

pub mod aggregate;
pub mod service;

pub use aggregate::{Cart, CartItem};
pub use service::CartService;
