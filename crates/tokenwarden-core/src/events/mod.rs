//! Session anomaly events delivered through a
//! [`NotificationSink`](crate::traits::NotificationSink).

pub mod session;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use session::SessionAlert;

/// Kind tag of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A refresh was presented from a different network origin than issuance.
    OriginChanged,
}

impl NotificationKind {
    /// Stable wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OriginChanged => "origin_changed",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
