//! Order tracking: poll submitted orders until they resolve or the budget runs out

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::audit::{OrderRecord, STATUS_TIMEOUT};
use crate::common::channels::{create_tracking_channel_with_size, TrackJob};
use crate::common::traits::{AuditSink, ExchangeClient};
use crate::common::types::OrderStatus;
use crate::config::types::TrackerConfig;

/// Mutable state of one tracker. Owned by its task, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTrackingState {
    pub order_id: String,
    pub symbol: String,
    pub checks_remaining: u32,
    /// Last status the exchange reported, if any query succeeded
    pub status: Option<OrderStatus>,
}

impl OrderTrackingState {
    pub fn new(job: &TrackJob, max_checks: u32) -> Self {
        Self {
            order_id: job.order_id.clone(),
            symbol: job.symbol.clone(),
            checks_remaining: max_checks,
            status: None,
        }
    }
}

/// How tracking of an order ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingOutcome {
    Filled { checks: u32 },
    /// Canceled, expired or rejected by the exchange
    Terminal { status: OrderStatus, checks: u32 },
    /// Budget exhausted with the order still open (or never observed)
    TimedOut {
        last_status: Option<OrderStatus>,
        checks: u32,
    },
}

impl TrackingOutcome {
    pub fn checks(&self) -> u32 {
        match self {
            TrackingOutcome::Filled { checks }
            | TrackingOutcome::Terminal { checks, .. }
            | TrackingOutcome::TimedOut { checks, .. } => *checks,
        }
    }

    /// Status column written to the audit log
    pub fn audit_status(&self) -> &'static str {
        match self {
            TrackingOutcome::Filled { .. } => OrderStatus::Filled.as_str(),
            TrackingOutcome::Terminal { status, .. } => status.as_str(),
            TrackingOutcome::TimedOut { .. } => STATUS_TIMEOUT,
        }
    }

    fn message(&self) -> String {
        match self {
            TrackingOutcome::Filled { checks } => format!("Order filled after {} checks", checks),
            TrackingOutcome::Terminal { status, checks } => {
                format!("Order {} after {} checks", status, checks)
            }
            TrackingOutcome::TimedOut {
                last_status: Some(status),
                checks,
            } => format!("Still {} after {} checks", status, checks),
            TrackingOutcome::TimedOut {
                last_status: None,
                checks,
            } => format!("No status observed after {} checks", checks),
        }
    }
}

/// Polls order status with a fixed interval and a bounded number of checks
pub struct OrderTracker {
    exchange: Arc<dyn ExchangeClient>,
    audit: Arc<dyn AuditSink>,
    config: TrackerConfig,
}

impl OrderTracker {
    pub fn new(
        exchange: Arc<dyn ExchangeClient>,
        audit: Arc<dyn AuditSink>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            exchange,
            audit,
            config,
        }
    }

    /// Track one order to completion and write its single audit record
    pub async fn track(&self, job: &TrackJob) -> TrackingOutcome {
        let mut state = OrderTrackingState::new(job, self.config.max_checks);
        let outcome = self.poll(&mut state).await;

        match outcome {
            TrackingOutcome::Filled { .. } => {
                info!("Order {} ({}) filled", state.order_id, state.symbol)
            }
            TrackingOutcome::Terminal { status, .. } => {
                info!("Order {} ({}) ended as {}", state.order_id, state.symbol, status)
            }
            TrackingOutcome::TimedOut { .. } => warn!(
                "Stopped tracking order {} ({}) after {} checks",
                state.order_id,
                state.symbol,
                outcome.checks()
            ),
        }

        let mut record = OrderRecord::new(outcome.audit_status(), outcome.message());
        record.symbol = Some(state.symbol.clone());
        record.order_id = Some(state.order_id.clone());
        if let Err(e) = self.audit.append(&record).await {
            error!("Failed to write tracking record for {}: {}", state.order_id, e);
        }

        outcome
    }

    async fn poll(&self, state: &mut OrderTrackingState) -> TrackingOutcome {
        let interval = self.config.poll_interval();
        let mut checks = 0;

        while state.checks_remaining > 0 {
            sleep(interval).await;
            state.checks_remaining -= 1;
            checks += 1;

            match self
                .exchange
                .query_order(&state.symbol, &state.order_id)
                .await
            {
                Ok(status) => {
                    debug!("Order {} check {}: {}", state.order_id, checks, status);
                    state.status = Some(status);
                    if status == OrderStatus::Filled {
                        return TrackingOutcome::Filled { checks };
                    }
                    if status.is_terminal() {
                        return TrackingOutcome::Terminal { status, checks };
                    }
                }
                Err(e) => warn!(
                    "Status check {} for order {} failed: {}",
                    checks, state.order_id, e
                ),
            }
        }

        TrackingOutcome::TimedOut {
            last_status: state.status,
            checks,
        }
    }

    /// Start the dispatcher and return the handle the pipeline enqueues through
    pub fn start(self) -> (TrackerHandle, JoinHandle<()>) {
        let (tx, rx) = create_tracking_channel_with_size(self.config.queue_size);
        let dispatcher = Arc::new(self).spawn(rx);
        (TrackerHandle::new(tx), dispatcher)
    }

    /// Consume jobs from `rx`, running each on its own task.
    ///
    /// At most `max_concurrent` trackers poll at once; further jobs wait in
    /// the channel. The dispatcher exits when every sender is dropped.
    pub fn spawn(self: Arc<Self>, mut rx: mpsc::Receiver<TrackJob>) -> JoinHandle<()> {
        let slots = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let permit = match Arc::clone(&slots).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let tracker = Arc::clone(&self);
                tokio::spawn(async move {
                    tracker.track(&job).await;
                    drop(permit);
                });
            }
            debug!("Tracking queue closed");
        })
    }
}

/// Non-blocking entry point into the tracker queue
#[derive(Clone)]
pub struct TrackerHandle {
    sender: mpsc::Sender<TrackJob>,
}

impl TrackerHandle {
    pub fn new(sender: mpsc::Sender<TrackJob>) -> Self {
        Self { sender }
    }

    /// Queue an order for tracking. Returns false if the queue is full or closed.
    pub fn track(&self, order_id: impl Into<String>, symbol: impl Into<String>) -> bool {
        let job = TrackJob::new(order_id, symbol);
        match self.sender.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!("Tracking queue full, order {} will not be tracked", job.order_id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                error!("Tracker stopped, order {} will not be tracked", job.order_id);
                false
            }
        }
    }
}
