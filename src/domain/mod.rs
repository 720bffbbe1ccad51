// ============================================================================
// Storefront Domain
// ============================================================================
//
// One module per aggregate:
// - cart:  a customer's mutable pre-purchase selection
// - promo: percentage discount reference data
// - order: the checkout snapshot and its fulfillment lifecycle
// - user:  profiles and the delivery-agent view
//
// ============================================================================

pub mod cart;
pub mod order;
pub mod promo;
pub mod user;
