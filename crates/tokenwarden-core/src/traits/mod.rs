//! Core traits defined in `tokenwarden-core` and implemented by other crates.

pub mod notification;

pub use notification::NotificationSink;
