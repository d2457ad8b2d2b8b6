//! # Storage capability traits.
//!
//! This module defines the interface contracts between the settlement flow and its storage
//! collaborators. Each collaborator gets its own narrow trait so that the
//! [`SettlementApi`](crate::SettlementApi) can be tested against in-memory fakes, and so that
//! backends can split the stores across different systems if they want to:
//!
//! * [`PaymentStore`] is the single source of truth for payment attempts, keyed by the
//!   gateway-facing transaction uuid.
//! * [`OrderStore`] materializes and transitions orders.
//! * [`ProductCatalog`] exposes batched product reads and conditional stock adjustments.
//! * [`CartStore`] clears a user's cart after settlement.
mod cart;
mod catalog;
mod orders;
mod payments;

pub use cart::{CartStore, CartStoreError};
pub use catalog::{CatalogError, ProductCatalog};
pub use orders::{OrderStore, OrderStoreError};
pub use payments::{PaymentStore, PaymentStoreError};
