//! Step definitions for job queue scenarios.

mod given;
mod then;
mod when;
pub mod world;
