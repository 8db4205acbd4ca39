//! Third-party integrations configured per tenant.
//!
//! Each tenant holds at most one integration per provider. Settings are a
//! tagged enum validated before they are stored; credentials live outside
//! this crate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
