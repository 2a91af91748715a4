use async_trait::async_trait;
use csv::WriterBuilder;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

use super::OrderRecord;
use crate::common::errors::AuditError;
use crate::common::traits::AuditSink;

/// Audit columns, in file order
pub const CSV_HEADER: &[&str] = &[
    "timestamp",
    "symbol",
    "action",
    "strategy_price",
    "order_price",
    "quantity",
    "bid",
    "ask",
    "status",
    "message",
    "order_id",
];

/// CSV file sink. Appends go through a single writer lock and are flushed per row.
pub struct CsvAuditLog {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvAuditLog {
    /// Open (or create) the log, writing the header only into an empty file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let need_header = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if need_header {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
        }

        info!("Audit log: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for CsvAuditLog {
    async fn append(&self, record: &OrderRecord) -> Result<(), AuditError> {
        let mut writer = self.writer.lock().await;
        writer.write_record(record.to_row())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::STATUS_REJECTED;
    use std::sync::Arc;

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("orders.csv");

        {
            let log = CsvAuditLog::open(&path).unwrap();
            log.append(&OrderRecord::new(STATUS_REJECTED, "bad alert"))
                .await
                .unwrap();
        }
        {
            let log = CsvAuditLog::open(&path).unwrap();
            log.append(&OrderRecord::new(STATUS_REJECTED, "another, with comma"))
                .await
                .unwrap();
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[2].contains("\"another, with comma\""));
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let log = Arc::new(CsvAuditLog::open(&path).unwrap());

        let mut handles = Vec::new();
        for i in 0..20 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.append(&OrderRecord::new(STATUS_REJECTED, format!("row {}", i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|row| row.len() == CSV_HEADER.len()));
    }
}
