//! Named, versioned request/response agents.
//!
//! An agent pairs an [`domain::AgentSpec`] with an
//! [`ports::AgentHandler`]. Running an agent announces `agent.started` on
//! the event bus, awaits the handler and then announces either
//! `agent.completed` or `agent.failed`.

pub mod domain;
pub mod ports;
pub mod services;
