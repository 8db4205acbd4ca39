//! Slotboard: domain core for a multi-tenant scheduling admin panel.
//!
//! The crate owns the rules behind the panel's workflow board, appointment
//! lifecycle, financial ledger and third-party integrations. Rendering,
//! authentication and delivery of outbound messages live elsewhere.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and notification
//! - **Adapters**: In-memory implementations, plus `PostgreSQL` for the
//!   board and appointments
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`board`]: Kanban columns, cards, moves and per-column stats
//! - [`appointment`]: Appointment booking and the status state machine
//! - [`ledger`]: Receivables, payables and period summaries
//! - [`integration`]: Typed per-provider integration settings
//! - [`config`]: Service configuration
//! - [`tenant`]: Tenant identity shared by every context

pub mod appointment;
pub mod board;
pub mod config;
pub mod integration;
pub mod ledger;
pub mod tenant;
