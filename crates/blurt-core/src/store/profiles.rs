//! Profile records in the document store.

use std::sync::Arc;

use serde_json::Value;

use super::{DocumentStore, StoreResult};
use crate::auth::Session;
use crate::models::UserProfile;

const COLLECTION: &str = "profiles";

/// Typed access to the `profiles` collection.
///
/// Profiles are keyed by the identity provider's user id, one record per
/// user, overwritten in full on every save.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfileRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Writes the caller's profile record, replacing whatever was there.
    pub async fn save(&self, profile: &UserProfile, session: &Session) -> StoreResult<()> {
        let record = serde_json::to_value(profile)?;
        self.store
            .set(COLLECTION, &profile.id, record, &session.access_token)
            .await
    }

    /// Loads the profile for `user_id`, or `None` when it has never been
    /// written.
    pub async fn get(
        &self,
        user_id: &str,
        session: &Session,
    ) -> StoreResult<Option<UserProfile>> {
        let record = self
            .store
            .get(COLLECTION, user_id, &session.access_token)
            .await?;
        record.map(parse_profile).transpose()
    }
}

fn parse_profile(record: Value) -> StoreResult<UserProfile> {
    Ok(serde_json::from_value(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use crate::util::unix_timestamp_now;

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: None,
            access_token: "tok".to_string(),
            expires_at: unix_timestamp_now() + 3600,
        }
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let repo = ProfileRepository::new(Arc::new(MemoryDocumentStore::new()));
        let session = session("user-1");
        let profile = UserProfile::new("user-1".to_string(), "a@example.com".to_string());

        repo.save(&profile, &session).await.unwrap();
        let loaded = repo.get("user-1", &session).await.unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_record() {
        let repo = ProfileRepository::new(Arc::new(MemoryDocumentStore::new()));
        let session = session("user-1");

        let first = UserProfile {
            id: "user-1".to_string(),
            email: "old@example.com".to_string(),
            last_login: 1_000,
        };
        let second = UserProfile {
            id: "user-1".to_string(),
            email: "new@example.com".to_string(),
            last_login: 2_000,
        };
        repo.save(&first, &session).await.unwrap();
        repo.save(&second, &session).await.unwrap();

        let loaded = repo.get("user-1", &session).await.unwrap().unwrap();
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_users() {
        let repo = ProfileRepository::new(Arc::new(MemoryDocumentStore::new()));
        let loaded = repo.get("nobody", &session("user-1")).await.unwrap();
        assert_eq!(loaded, None);
    }
}
