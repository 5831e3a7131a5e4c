//! Port contracts for job execution.

mod handler;

pub use handler::{FnJobHandler, JobHandler, JobHandlerError, handler_fn};
