//! In-process publish/subscribe event bus.
//!
//! Publishers build an immutable [`EventEnvelope`], the bus records it in a
//! bounded history and then awaits every handler subscribed to the exact
//! topic followed by every wildcard (`*`) handler, in registration order,
//! on the publisher's task. Handlers have no error channel.

mod bus;
mod domain;
mod handler;

pub use bus::{DEFAULT_MAX_EVENTS, EventBus, EventBusConfig, MIN_HISTORY_CAPACITY};
pub use domain::{DEFAULT_EVENT_VERSION, EventEnvelope, EventId, SubscriptionId, WILDCARD_TOPIC};
pub use handler::{EventHandler, FnEventHandler, handler_fn};
