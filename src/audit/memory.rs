use async_trait::async_trait;
use tokio::sync::Mutex;

use super::OrderRecord;
use crate::common::errors::AuditError;
use crate::common::traits::AuditSink;

/// Simple in-memory audit sink
///
/// Useful for tests and dry runs.
#[derive(Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<OrderRecord>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything appended so far
    pub async fn records(&self) -> Vec<OrderRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn append(&self, record: &OrderRecord) -> Result<(), AuditError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}
