//! Security audit trail.
//!
//! Services report security-relevant transitions (job lifecycle, plugin
//! execution decisions) through [`ports::AuditLogger`]. Recording is
//! fire-and-forget: a failing sink must never fail the audited operation.

pub mod adapters;
pub mod ports;
