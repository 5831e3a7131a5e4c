//! Audit sink adapters.

use crate::audit::ports::AuditLogger;
use crate::context::Payload;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// `tracing` target used for audit events.
pub const AUDIT_TARGET: &str = "gitvibe::audit";

/// Emits every audit event as a `tracing` event on [`AUDIT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn security(&self, event: &str, actor: &str, details: &Payload) {
        let rendered = Value::Object(details.clone());
        tracing::info!(
            target: AUDIT_TARGET,
            event,
            actor,
            details = %rendered,
            "security audit event"
        );
    }
}

/// One recorded audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Event name, for example `job_enqueued`.
    pub event: String,
    /// Principal responsible for the event.
    pub actor: String,
    /// Structured details.
    pub details: Payload,
}

/// Audit sink that keeps every event in memory for inspection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record in arrival order.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Returns the event names in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|record| record.event.clone())
            .collect()
    }
}

impl AuditLogger for InMemoryAuditLog {
    fn security(&self, event: &str, actor: &str, details: &Payload) {
        self.records.lock().push(AuditRecord {
            event: event.to_owned(),
            actor: actor.to_owned(),
            details: details.clone(),
        });
    }
}
