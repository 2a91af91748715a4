//! Append-only audit trail of order outcomes
//!
//! One [`OrderRecord`] is written per terminal outcome: once by the pipeline
//! when an alert is accepted or rejected, and once by the tracker when the
//! order resolves or its polling budget runs out.

mod csv_log;
mod memory;

pub use csv_log::{CsvAuditLog, CSV_HEADER};
pub use memory::MemoryAuditLog;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::types::{format_decimal, Side};

/// Status written for an order accepted by the exchange
pub const STATUS_SUBMITTED: &str = "SUBMITTED";
/// Status written for an alert refused before or at submission
pub const STATUS_REJECTED: &str = "REJECTED";
/// Status written when tracking gave up with the order still open
pub const STATUS_TIMEOUT: &str = "TIMEOUT";

/// One audit row. Never mutated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub timestamp: DateTime<Utc>,
    pub symbol: Option<String>,
    pub action: Option<Side>,
    pub strategy_price: Option<Decimal>,
    pub order_price: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub status: String,
    pub message: String,
    pub order_id: Option<String>,
}

impl OrderRecord {
    /// Empty record with only a status and message set
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            symbol: None,
            action: None,
            strategy_price: None,
            order_price: None,
            quantity: None,
            bid: None,
            ask: None,
            status: status.into(),
            message: message.into(),
            order_id: None,
        }
    }

    /// Columns in [`CSV_HEADER`] order
    pub fn to_row(&self) -> Vec<String> {
        fn decimal(value: Option<Decimal>) -> String {
            value.map(format_decimal).unwrap_or_default()
        }

        vec![
            self.timestamp.to_rfc3339(),
            self.symbol.clone().unwrap_or_default(),
            self.action.map(|a| a.to_string()).unwrap_or_default(),
            decimal(self.strategy_price),
            decimal(self.order_price),
            decimal(self.quantity),
            decimal(self.bid),
            decimal(self.ask),
            self.status.clone(),
            self.message.clone(),
            self.order_id.clone().unwrap_or_default(),
        ]
    }
}
