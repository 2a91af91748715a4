//! Order pipeline
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 REQUEST PATH (per webhook)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  raw alert                                                  │
//! │       │  AlertParser::parse                                 │
//! │       ▼                                                     │
//! │  Instruction ──► book_ticker ──► sizer::size                │
//! │                                      │                      │
//! │                                      ▼                      │
//! │                 PricedOrder ──► place_order (signed)        │
//! │                                      │                      │
//! │                                      ▼                      │
//! │           audit SUBMITTED / REJECTED, TrackerHandle::track  │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BACKGROUND (tracker)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  mpsc queue ──► dispatcher ──► one task per order           │
//! │                  (semaphore)     sleep, query_order, ...    │
//! │                                  audit FILLED / ... / TIMEOUT│
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod orchestrator;
pub mod sizer;
mod tracker;

pub use orchestrator::{
    AlertOutcome, OrderPipeline, OrderSummary, QuoteSummary, DEFAULT_RECV_WINDOW,
};
pub use sizer::size;
pub use tracker::{OrderTracker, OrderTrackingState, TrackerHandle, TrackingOutcome};
