//! Audit ledger
//!
//! Every completed analysis is stored under a content-derived transaction id
//! so it can be verified later. Records are written once and never modified.

use crate::models::{AuditRecord, AuditVerification};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory, insert-once store keyed by transaction id.
#[derive(Clone)]
pub struct AuditLedger {
    records: Arc<RwLock<HashMap<String, AuditRecord>>>,
}

impl AuditLedger {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store an analysis and return its transaction id.
    ///
    /// Recording identical content at the same second yields the same id and
    /// leaves the first record untouched.
    pub async fn record(
        &self,
        company_name: &str,
        serialized_analysis: &str,
        timestamp_unix: i64,
    ) -> String {
        let transaction_id =
            compute_transaction_id(company_name, serialized_analysis, timestamp_unix);

        let mut records = self.records.write().await;
        let inserted = !records.contains_key(&transaction_id);
        records
            .entry(transaction_id.clone())
            .or_insert_with(|| AuditRecord {
                transaction_id: transaction_id.clone(),
                company_name: company_name.to_string(),
                serialized_analysis: serialized_analysis.to_string(),
                timestamp_unix,
            });

        if inserted {
            info!(
                transaction_id = %transaction_id,
                company = %company_name,
                "Audit record stored"
            );
        } else {
            debug!(transaction_id = %transaction_id, "Audit record already present");
        }

        transaction_id
    }

    pub async fn verify(&self, transaction_id: &str) -> AuditVerification {
        let records = self.records.read().await;

        match records.get(transaction_id) {
            Some(record) => AuditVerification {
                found: true,
                serialized_analysis: record.serialized_analysis.clone(),
                timestamp_unix: record.timestamp_unix,
            },
            None => AuditVerification {
                found: false,
                serialized_analysis: String::new(),
                timestamp_unix: 0,
            },
        }
    }

    /// Recompute the id from the stored content and compare.
    pub async fn verify_integrity(&self, transaction_id: &str) -> bool {
        let records = self.records.read().await;

        records.get(transaction_id).is_some_and(|record| {
            compute_transaction_id(
                &record.company_name,
                &record.serialized_analysis,
                record.timestamp_unix,
            ) == record.transaction_id
        })
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for AuditLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// `0x` + hex SHA-256 of `company:analysis:timestamp`.
pub fn compute_transaction_id(
    company_name: &str,
    serialized_analysis: &str,
    timestamp_unix: i64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(company_name.as_bytes());
    hasher.update(b":");
    hasher.update(serialized_analysis.as_bytes());
    hasher.update(b":");
    hasher.update(timestamp_unix.to_string().as_bytes());

    format!("0x{}", hex::encode(hasher.finalize()))
}
