//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tokenwarden_core::types::UserId;

/// An identity known to the service. Created on first authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// The identity's GUID.
    pub guid: UserId,
    /// When the identity was first seen.
    pub created_at: DateTime<Utc>,
}
