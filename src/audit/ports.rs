//! Audit sink contract.

use crate::context::Payload;

/// Receives structured security audit events.
pub trait AuditLogger: Send + Sync {
    /// Records `event` performed by `actor` with structured `details`.
    fn security(&self, event: &str, actor: &str, details: &Payload);
}
