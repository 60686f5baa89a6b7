//! The `utils` module provides shared building blocks used across the crate:
//! the crate-wide error type and the logging bootstrap.

pub mod error;
pub mod logging;
