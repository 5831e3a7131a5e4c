//! Agent registration and execution.

mod error;
mod framework;

pub use error::{AgentError, AgentResult};
pub use framework::{AGENT_EVENT_SOURCE, AgentFramework};
