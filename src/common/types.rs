//! Unified types shared by the pipeline and the exchange clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type. Only LIMIT orders are ever sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "LIMIT",
        }
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

/// Order status as reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    PartiallyCanceled,
    Expired,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Whether no further transition can occur
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Canceled
                | OrderStatus::PartiallyCanceled
                | OrderStatus::Expired
                | OrderStatus::Rejected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::PartiallyFilled => "PARTIALLY_FILLED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::PartiallyCanceled => "PARTIALLY_CANCELED",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stages of a single alert on its way to the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStage {
    Received,
    Parsed,
    Priced,
    Signed,
    Submitted,
    Accepted,
    Rejected,
}

impl std::fmt::Display for OrderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStage::Received => "received",
            OrderStage::Parsed => "parsed",
            OrderStage::Priced => "priced",
            OrderStage::Signed => "signed",
            OrderStage::Submitted => "submitted",
            OrderStage::Accepted => "accepted",
            OrderStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Whether orders reach the exchange or are simulated locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingMode {
    #[serde(rename = "REAL")]
    Live,
    #[serde(rename = "SIMULATION")]
    Simulation,
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingMode::Live => write!(f, "REAL"),
            TradingMode::Simulation => write!(f, "SIMULATION"),
        }
    }
}

/// Top of book for one symbol, fetched fresh for every order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub bid: Decimal,
    pub ask: Decimal,
    pub bid_qty: Decimal,
    pub ask_qty: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Both sides quoted with a positive price
    pub fn is_usable(&self) -> bool {
        self.bid > Decimal::ZERO && self.ask > Decimal::ZERO
    }

    /// Price that crosses the spread for the given side
    pub fn crossing_price(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.ask,
            Side::Sell => self.bid,
        }
    }
}

/// Order sized and priced by the risk sizer, already rounded to the symbol's steps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedOrder {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub notional: Decimal,
    /// Price the strategy asked for, when the alert carried one
    pub strategy_price: Option<Decimal>,
}

/// A LIMIT/GTC order ready to be signed
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub recv_window: u64,
}

impl OrderRequest {
    /// Build a GTC limit order from a priced order
    pub fn limit(priced: &PricedOrder, timestamp: i64, recv_window: u64) -> Self {
        Self {
            symbol: priced.symbol.clone(),
            side: priced.side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            quantity: priced.quantity,
            price: priced.price,
            timestamp,
            recv_window,
        }
    }
}

/// Identifier the exchange assigned to an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
    pub order_id: String,
    pub symbol: String,
}

/// Render a decimal the way it is both signed and transmitted: normalized, no exponent
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}
