//! MexcAlertBridge Library
//!
//! Turns charting-tool webhook alerts into signed MEXC spot limit orders,
//! tracks each order until it resolves and keeps a CSV audit trail.

pub mod alert;
pub mod audit;
pub mod common;
pub mod config;
pub mod mexc;
pub mod pipeline;
pub mod server;

// Re-export commonly used types
pub use alert::{AlertFormat, AlertParser, Instruction, Sizing};
pub use audit::{CsvAuditLog, MemoryAuditLog, OrderRecord};
pub use common::errors::{ExchangeError, ParseError, PipelineError, Result, SignatureError, SizeError};
pub use common::traits::{AuditSink, ExchangeClient};
pub use common::types::{
    MarketSnapshot, OrderRequest, OrderStage, OrderStatus, PlacedOrder, PricedOrder, Side,
    TradingMode,
};
pub use config::types::AppConfig;
pub use mexc::{MexcRestClient, PaperExchange};
pub use pipeline::{AlertOutcome, OrderPipeline, OrderTracker, TrackerHandle, TrackingOutcome};
pub use server::AppState;
