//! Financial ledger: receivables, payables and period metrics.
//!
//! - Domain types and summary arithmetic in [`domain`]
//! - Port contracts in [`ports`]
//! - The in-memory adapter in [`adapters`]
//! - Orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
