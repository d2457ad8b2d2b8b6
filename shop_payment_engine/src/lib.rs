//! Shop Payment Engine
//!
//! The engine owns the checkout / payment-settlement pipeline for the storefront: availability
//! checks, pending payment records, the settlement state machine that turns a confirmed gateway
//! payment into an order plus stock adjustments, and user-initiated cancellation.
//!
//! The library is divided into two main sections:
//! 1. Storage traits and their SQLite implementation ([`mod@traits`], [`mod@sqlite`]). The traits
//!    are deliberately narrow, one capability per collaborator (payments, orders, catalog stock,
//!    carts), so the settlement flow can be exercised against fakes.
//! 2. The public settlement API ([`SettlementApi`]), generic over any backend that implements the
//!    storage traits.
//!
//! Talking to the eSewa gateway itself is out of this crate's hands; see the `esewa_tools` crate.
pub mod db_types;
mod spe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use spe_api::{SettlementApi, SettlementError};
