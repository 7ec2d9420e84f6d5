//! Core type definitions used across the Tokenwarden workspace.

pub mod id;

pub use id::*;
