//! Step definitions for appointment status scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
