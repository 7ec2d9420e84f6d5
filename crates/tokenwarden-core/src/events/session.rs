//! Session-related anomaly alerts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

use super::NotificationKind;

/// Low-confidence anomaly signals raised during token refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionAlert {
    /// The refresh came from a different address than the session was issued to.
    OriginChanged {
        /// The session owner.
        user_id: UserId,
        /// Address recorded at issuance.
        old_address: String,
        /// Address presenting the refresh token.
        new_address: String,
    },
}

impl SessionAlert {
    /// Notification kind for this alert.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::OriginChanged { .. } => NotificationKind::OriginChanged,
        }
    }

    /// Flattens the alert into the string map handed to the sink.
    pub fn payload(&self) -> HashMap<String, String> {
        match self {
            Self::OriginChanged {
                user_id,
                old_address,
                new_address,
            } => HashMap::from([
                ("user_id".to_string(), user_id.to_string()),
                ("old_address".to_string(), old_address.clone()),
                ("new_address".to_string(), new_address.clone()),
                (
                    "warn".to_string(),
                    format!("changed ip from {old_address} to {new_address}"),
                ),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_changed_payload() {
        let user_id = UserId::new();
        let alert = SessionAlert::OriginChanged {
            user_id,
            old_address: "1.1.1.1".to_string(),
            new_address: "2.2.2.2".to_string(),
        };
        let payload = alert.payload();

        assert_eq!(alert.kind(), NotificationKind::OriginChanged);
        assert_eq!(payload["user_id"], user_id.to_string());
        assert_eq!(payload["old_address"], "1.1.1.1");
        assert_eq!(payload["new_address"], "2.2.2.2");
        assert_eq!(payload["warn"], "changed ip from 1.1.1.1 to 2.2.2.2");
    }
}
