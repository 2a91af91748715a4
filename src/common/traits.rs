//! Trait definitions for the pipeline's collaborators

use async_trait::async_trait;

use super::errors::{AuditError, Result};
use super::types::{MarketSnapshot, OrderRequest, OrderStatus, PlacedOrder};
use crate::audit::OrderRecord;

/// Trait for exchange clients (live REST, paper trading)
///
/// The pipeline only depends on this capability: market data for pricing,
/// order placement, and order-status queries for tracking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Fetch the current best bid/ask for a symbol
    async fn book_ticker(&self, symbol: &str) -> Result<MarketSnapshot>;

    /// Sign and submit a limit order
    ///
    /// Never retried: a second attempt could execute twice.
    async fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder>;

    /// Query the current status of an order
    async fn query_order(&self, symbol: &str, order_id: &str) -> Result<OrderStatus>;

    /// Get the name of the exchange backend
    fn name(&self) -> &'static str;
}

/// Append-only sink for order audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record. Concurrent callers must never interleave rows.
    async fn append(&self, record: &OrderRecord) -> std::result::Result<(), AuditError>;
}
