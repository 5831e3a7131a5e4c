//! Step definitions for plugin permission scenarios.

mod given;
mod then;
mod when;
pub mod world;
