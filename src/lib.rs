//! Storefront order & fulfillment core.
//!
//! Library consumed by the storefront screens: carts, promo codes, checkout,
//! delivery assignment, and order tracking over an opaque hosted document
//! store. The store is reached only through the [`store::DocumentStore`]
//! trait; all cart and order mutations are compare-and-swap writes with
//! bounded retry.

pub mod assignment;
pub mod catalog;
pub mod context;
pub mod domain;
pub mod error;
pub mod identity;
pub mod store;
pub mod util;

pub use assignment::{AgentPool, AssignmentPolicy, FirstAvailable, RoundRobin};
pub use catalog::{Product, ProductCatalog};
pub use context::RequestContext;
pub use domain::cart::{Cart, CartItem, CartService};
pub use domain::order::{CheckoutService, Order, OrderRepository, OrderStatus};
pub use domain::promo::{PromoCode, PromoEngine};
pub use domain::user::{Agent, Role, UserDirectory, UserProfile};
pub use error::CoreError;
pub use identity::{Credential, IdentityError, IdentityProvider};
pub use store::{DocumentStore, InMemoryStore, StoreHandle};
