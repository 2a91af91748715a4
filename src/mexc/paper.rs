//! Paper trading: live market data, simulated order placement

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::ExchangeClient;
use crate::common::types::{MarketSnapshot, OrderRequest, OrderStatus, PlacedOrder};

/// Exchange used when no API credentials are configured
///
/// Quotes come from the wrapped client; orders never leave the process and
/// report `FILLED` as soon as they are queried.
pub struct PaperExchange {
    market_data: Arc<dyn ExchangeClient>,
    /// Keeps ids unique when orders share a millisecond
    sequence: AtomicU64,
}

impl PaperExchange {
    pub fn new(market_data: Arc<dyn ExchangeClient>) -> Self {
        Self {
            market_data,
            sequence: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl ExchangeClient for PaperExchange {
    async fn book_ticker(&self, symbol: &str) -> Result<MarketSnapshot> {
        self.market_data.book_ticker(symbol).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let order_id = format!("SIM_{}_{}", order.timestamp, seq);
        info!(
            "SIMULATION: {} {} {} @ {} ({})",
            order.side, order.quantity, order.symbol, order.price, order_id
        );
        Ok(PlacedOrder {
            order_id,
            symbol: order.symbol.clone(),
        })
    }

    async fn query_order(&self, _symbol: &str, _order_id: &str) -> Result<OrderStatus> {
        Ok(OrderStatus::Filled)
    }

    fn name(&self) -> &'static str {
        "paper"
    }
}
