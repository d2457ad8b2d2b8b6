mod errors;
mod settlement_api;

pub use errors::SettlementError;
pub use settlement_api::SettlementApi;
