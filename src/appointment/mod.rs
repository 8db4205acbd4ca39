//! Appointment booking and status lifecycle.
//!
//! Appointments move through pending, in-progress, completed and cancelled
//! states, plus tenant-defined custom statuses. Which changes are accepted
//! depends on the configured [`domain::TransitionPolicy`]. The module
//! follows hexagonal architecture:
//!
//! - Domain types and transition rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
