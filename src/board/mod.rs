//! Kanban board ordering and transition engine.
//!
//! A board holds ordered columns, each with an optional work-in-progress
//! limit, and cards placed at dense positions inside their column. The
//! module follows hexagonal architecture:
//!
//! - Domain types and placement rules in [`domain`]
//! - Port contracts for persistence and change notification in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The caller-owned [`services::BoardStore`] in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
