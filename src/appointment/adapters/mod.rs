//! Adapter implementations for appointment ports.

pub mod memory;
pub mod postgres;
