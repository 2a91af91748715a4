//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use mexc_alert_bridge::common::errors::{ExchangeError, Result, SignatureError};
use mexc_alert_bridge::common::traits::ExchangeClient;
use mexc_alert_bridge::common::types::{
    MarketSnapshot, OrderRequest, OrderStatus, PlacedOrder,
};
use mexc_alert_bridge::config::types::RiskPolicy;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default policy with a lower floor so small notional alerts go through
pub static PERMISSIVE_POLICY: Lazy<RiskPolicy> = Lazy::new(|| RiskPolicy {
    min_notional: dec!(0.1),
    ..RiskPolicy::default()
});

/// Create a sample XRPUSDT quote (bid 0.49 / ask 0.50)
pub fn sample_snapshot() -> MarketSnapshot {
    snapshot("XRPUSDT", dec!(0.49), dec!(0.50))
}

pub fn snapshot(symbol: &str, bid: Decimal, ask: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        symbol: symbol.to_string(),
        bid,
        ask,
        bid_qty: dec!(12000),
        ask_qty: dec!(8000),
        fetched_at: chrono::Utc::now(),
    }
}

/// In-process exchange with a fixed quote and a scripted status sequence
///
/// Every placed order is recorded; queries pop the next scripted status and
/// repeat the last one once the script runs out.
pub struct FakeExchange {
    quote: MarketSnapshot,
    statuses: Mutex<VecDeque<OrderStatus>>,
    pub placed: Mutex<Vec<OrderRequest>>,
    pub queries: Mutex<u32>,
    fail_signing: bool,
}

impl FakeExchange {
    pub fn new(quote: MarketSnapshot, statuses: Vec<OrderStatus>) -> Self {
        Self {
            quote,
            statuses: Mutex::new(statuses.into()),
            placed: Mutex::new(Vec::new()),
            queries: Mutex::new(0),
            fail_signing: false,
        }
    }

    /// Every order placement fails while signing, before reaching the venue
    pub fn failing_signatures(mut self) -> Self {
        self.fail_signing = true;
        self
    }

    pub fn placed_count(&self) -> usize {
        self.placed.lock().unwrap().len()
    }

    pub fn query_count(&self) -> u32 {
        *self.queries.lock().unwrap()
    }
}

#[async_trait]
impl ExchangeClient for FakeExchange {
    async fn book_ticker(&self, symbol: &str) -> Result<MarketSnapshot> {
        if symbol != self.quote.symbol {
            return Err(ExchangeError::Status {
                status: 400,
                body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
            });
        }
        Ok(self.quote.clone())
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder> {
        if self.fail_signing {
            return Err(ExchangeError::Signature(SignatureError::InvalidKey(
                "invalid key length".to_string(),
            )));
        }
        let mut placed = self.placed.lock().unwrap();
        placed.push(order.clone());
        Ok(PlacedOrder {
            order_id: format!("C02__{}", placed.len()),
            symbol: order.symbol.clone(),
        })
    }

    async fn query_order(&self, _symbol: &str, _order_id: &str) -> Result<OrderStatus> {
        *self.queries.lock().unwrap() += 1;
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().copied()
        };
        Ok(status.unwrap_or(OrderStatus::New))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Sample MEXC REST responses
pub mod api_responses {
    pub const BOOK_TICKER: &str = r#"{
        "symbol": "XRPUSDT",
        "bidPrice": "0.4900",
        "bidQty": "12000.5",
        "askPrice": "0.5000",
        "askQty": "8000"
    }"#;

    pub const NEW_ORDER: &str = r#"{
        "symbol": "XRPUSDT",
        "orderId": "C02__443776347957968896",
        "orderListId": -1,
        "price": "0.5",
        "origQty": "100",
        "type": "LIMIT",
        "side": "BUY",
        "transactTime": 1718000000123
    }"#;

    pub const NEW_ORDER_NUMERIC_ID: &str = r#"{
        "symbol": "XRPUSDT",
        "orderId": 443776347957968896,
        "transactTime": 1718000000123
    }"#;

    pub const QUERY_ORDER_FILLED: &str = r#"{
        "symbol": "XRPUSDT",
        "orderId": "C02__443776347957968896",
        "price": "0.5",
        "origQty": "100",
        "executedQty": "100",
        "status": "FILLED",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "side": "BUY"
    }"#;

    pub const INSUFFICIENT_BALANCE: &str = r#"{"code":30004,"msg":"Insufficient position"}"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_snapshot() {
        let quote = sample_snapshot();
        assert!(quote.is_usable());
        assert!(quote.bid < quote.ask);
    }
}
