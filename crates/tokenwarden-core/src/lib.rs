//! # tokenwarden-core
//!
//! Core crate for Tokenwarden. Contains the unified error system,
//! configuration schemas, typed identifiers, session alert events,
//! and the notification sink trait.
//!
//! This crate has **no** internal dependencies on other Tokenwarden crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
