//! Built-in plugin implementations.

mod health_probe;

pub use health_probe::HealthProbePlugin;
