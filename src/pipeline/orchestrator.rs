//! Alert -> signed limit order

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::sizer::size;
use super::tracker::TrackerHandle;
use crate::alert::{AlertParser, Instruction};
use crate::audit::{OrderRecord, STATUS_REJECTED, STATUS_SUBMITTED};
use crate::common::errors::{PipelineError, SizeError};
use crate::common::traits::{AuditSink, ExchangeClient};
use crate::common::types::{OrderRequest, Side, TradingMode};
use crate::config::types::RiskPolicy;

/// Default `recvWindow` sent with signed requests, in milliseconds
pub const DEFAULT_RECV_WINDOW: u64 = 5000;

/// Order as it was sent to the exchange
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub strategy_price: Option<Decimal>,
}

/// Quote the order was priced against
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteSummary {
    pub bid: Decimal,
    pub ask: Decimal,
}

/// Result of an accepted alert, returned to the webhook caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertOutcome {
    /// `buy_order_placed` or `sell_order_placed`
    pub status: String,
    pub mode: TradingMode,
    pub instruction: Instruction,
    pub order: OrderSummary,
    pub order_id: String,
    pub market: QuoteSummary,
    /// False when the tracking queue refused the order
    pub tracking: bool,
}

/// Runs an alert through parse, size, submit and hand-off to the tracker
///
/// Stateless between alerts: every call parses afresh, fetches a fresh quote
/// and never retries an exchange call.
pub struct OrderPipeline {
    parser: AlertParser,
    policy: RiskPolicy,
    exchange: Arc<dyn ExchangeClient>,
    audit: Arc<dyn AuditSink>,
    tracker: TrackerHandle,
    mode: TradingMode,
    recv_window: u64,
}

impl OrderPipeline {
    pub fn new(
        parser: AlertParser,
        policy: RiskPolicy,
        exchange: Arc<dyn ExchangeClient>,
        audit: Arc<dyn AuditSink>,
        tracker: TrackerHandle,
        mode: TradingMode,
    ) -> Self {
        Self {
            parser,
            policy,
            exchange,
            audit,
            tracker,
            mode,
            recv_window: DEFAULT_RECV_WINDOW,
        }
    }

    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn mode(&self) -> TradingMode {
        self.mode
    }

    pub fn parser(&self) -> &AlertParser {
        &self.parser
    }

    /// Process one alert. Writes exactly one audit record either way.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub async fn handle_alert(&self, raw: &str) -> Result<AlertOutcome, PipelineError> {
        let mut record = OrderRecord::new(STATUS_REJECTED, "");
        let result = self.process(raw, &mut record).await;

        match &result {
            Ok(outcome) => {
                info!(
                    "{} order {} placed: {} {} @ {}",
                    self.mode,
                    outcome.order_id,
                    outcome.order.side,
                    outcome.order.quantity,
                    outcome.order.price
                );
                record.status = STATUS_SUBMITTED.to_string();
                record.message = format!("{} order placed", self.mode);
            }
            Err(e) if e.is_internal() => {
                error!("Alert {:?} failed at {}: {}", raw, e.stage(), e);
                record.message = e.to_string();
            }
            Err(e) => {
                warn!("Alert {:?} rejected at {}: {}", raw, e.stage(), e);
                record.message = e.to_string();
            }
        }

        if let Err(e) = self.audit.append(&record).await {
            error!("Failed to write audit record: {}", e);
        }

        result
    }

    async fn process(
        &self,
        raw: &str,
        record: &mut OrderRecord,
    ) -> Result<AlertOutcome, PipelineError> {
        let instruction = self.parser.parse(raw)?;
        record.symbol = Some(instruction.symbol.clone());
        record.action = Some(instruction.action);
        record.strategy_price = instruction.strategy_price();

        let snapshot = self
            .exchange
            .book_ticker(&instruction.symbol)
            .await
            .map_err(|e| {
                warn!("Book ticker for {} unavailable: {}", instruction.symbol, e);
                SizeError::NoMarketData(instruction.symbol.clone())
            })?;
        record.bid = Some(snapshot.bid);
        record.ask = Some(snapshot.ask);

        let priced = size(&instruction, &snapshot, &self.policy)?;
        record.order_price = Some(priced.price);
        record.quantity = Some(priced.quantity);

        let request =
            OrderRequest::limit(&priced, Utc::now().timestamp_millis(), self.recv_window);
        let placed = self.exchange.place_order(&request).await?;
        record.order_id = Some(placed.order_id.clone());

        let tracking = self
            .tracker
            .track(placed.order_id.clone(), placed.symbol.clone());

        let status = match priced.side {
            Side::Buy => "buy_order_placed",
            Side::Sell => "sell_order_placed",
        };

        Ok(AlertOutcome {
            status: status.to_string(),
            mode: self.mode,
            order: OrderSummary {
                symbol: priced.symbol,
                side: priced.side,
                quantity: priced.quantity,
                price: priced.price,
                strategy_price: priced.strategy_price,
            },
            order_id: placed.order_id,
            market: QuoteSummary {
                bid: snapshot.bid,
                ask: snapshot.ask,
            },
            instruction,
            tracking,
        })
    }
}
