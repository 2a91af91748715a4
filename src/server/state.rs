use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::common::types::TradingMode;
use crate::pipeline::OrderPipeline;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<OrderPipeline>,
    pub mode: TradingMode,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: Arc<OrderPipeline>) -> Self {
        Self {
            mode: pipeline.mode(),
            pipeline,
            started_at: Utc::now(),
        }
    }
}
