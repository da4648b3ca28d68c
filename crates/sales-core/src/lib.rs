//! Shared building blocks for Sales Explorer.
//!
//! Holds the error type, the in-memory [`models::Table`], number formatting
//! helpers and the command-line settings layer.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, SalesError};
pub use models::{Table, Value};
