//! User profile model

use serde::{Deserialize, Serialize};

use crate::util::unix_timestamp_ms;

/// Application-side profile record for a signed-in user.
///
/// Keyed by the identity provider's user id and rewritten in full on
/// every successful sign-in, so `last_login` always reflects the most
/// recent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub last_login: i64,
}

impl UserProfile {
    /// Builds a profile stamped with the current time as `last_login`.
    #[must_use]
    pub fn new(id: String, email: String) -> Self {
        Self {
            id,
            email,
            last_login: unix_timestamp_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_stamps_last_login() {
        let before = unix_timestamp_ms();
        let profile = UserProfile::new("user-1".to_string(), "a@example.com".to_string());
        let after = unix_timestamp_ms();

        assert_eq!(profile.id, "user-1");
        assert_eq!(profile.email, "a@example.com");
        assert!(profile.last_login >= before && profile.last_login <= after);
    }

    #[test]
    fn profiles_round_trip_through_json() {
        let profile = UserProfile {
            id: "user-1".to_string(),
            email: "a@example.com".to_string(),
            last_login: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
