//! Adapter implementations for integration ports.

pub mod memory;
