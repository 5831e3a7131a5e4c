//! Sequential workflows composed of events, agents and plugins.
//!
//! A [`domain::WorkflowDefinition`] is an ordered list of steps. The
//! [`services::WorkflowEngine`] runs the steps strictly in order, offers each
//! one to the `workflow.before_step` and `workflow.after_step` extension
//! points and stops at the first failing step.

pub mod domain;
pub mod services;
