//! Port contracts for integration persistence.

pub mod repository;

pub use repository::{
    IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult,
};
