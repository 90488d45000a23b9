//! Post records in the document store.

use std::sync::Arc;

use serde_json::Value;

use super::{DocumentStore, StoreResult};
use crate::auth::Session;
use crate::models::Post;

const COLLECTION: &str = "posts";

/// Typed access to the `posts` collection.
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn DocumentStore>,
}

impl PostRepository {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Inserts `post` and returns it with the id the store assigned.
    pub async fn create(&self, post: &Post, session: &Session) -> StoreResult<Post> {
        let record = serde_json::to_value(post)?;
        let id = self
            .store
            .create(COLLECTION, record, &session.access_token)
            .await?;
        Ok(Post {
            id: Some(id),
            ..post.clone()
        })
    }

    /// Overwrites the record at `id` with `post` in full.
    pub async fn set(&self, id: &str, post: &Post, session: &Session) -> StoreResult<()> {
        let record = serde_json::to_value(post)?;
        self.store
            .set(COLLECTION, id, record, &session.access_token)
            .await
    }

    pub async fn get(&self, id: &str, session: &Session) -> StoreResult<Option<Post>> {
        let record = self
            .store
            .get(COLLECTION, id, &session.access_token)
            .await?;
        record.map(parse_post).transpose()
    }

    pub async fn delete(&self, id: &str, session: &Session) -> StoreResult<()> {
        self.store
            .delete(COLLECTION, id, &session.access_token)
            .await
    }

    /// Lists the session user's posts, newest first.
    pub async fn list_for(&self, session: &Session) -> StoreResult<Vec<Post>> {
        let records = self
            .store
            .query_eq(COLLECTION, "user_id", &session.user_id, &session.access_token)
            .await?;
        let mut posts = records
            .into_iter()
            .map(parse_post)
            .collect::<StoreResult<Vec<_>>>()?;
        posts.sort_by_key(|post| std::cmp::Reverse(post.timestamp));
        Ok(posts)
    }
}

fn parse_post(record: Value) -> StoreResult<Post> {
    Ok(serde_json::from_value(record)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

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

    async fn seed(store: &MemoryDocumentStore, id: &str, user_id: &str, timestamp: i64) -> Post {
        let post = Post {
            id: Some(id.to_string()),
            title: format!("Title {id}"),
            content: "Content".to_string(),
            timestamp,
            user_id: user_id.to_string(),
        };
        store
            .set(COLLECTION, id, serde_json::to_value(&post).unwrap(), "tok")
            .await
            .unwrap();
        post
    }

    #[tokio::test]
    async fn create_returns_the_post_with_its_assigned_id() {
        let repo = PostRepository::new(Arc::new(MemoryDocumentStore::new()));
        let session = session("user-1");
        let post = Post::new("T".to_string(), "C".to_string(), "user-1".to_string());

        let created = repo.create(&post, &session).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.title, post.title);

        let loaded = repo
            .get(created.id.as_deref().unwrap(), &session)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn list_for_returns_only_the_users_posts_newest_first() {
        let store = Arc::new(MemoryDocumentStore::new());
        let repo = PostRepository::new(Arc::clone(&store) as _);
        let session = session("user-1");

        let older = seed(&store, "p-1", "user-1", 1_000).await;
        let newer = seed(&store, "p-2", "user-1", 2_000).await;
        seed(&store, "p-3", "someone-else", 3_000).await;

        let posts = repo.list_for(&session).await.unwrap();
        assert_eq!(posts, vec![newer, older]);
    }

    #[tokio::test]
    async fn list_for_is_empty_for_a_user_with_no_posts() {
        let repo = PostRepository::new(Arc::new(MemoryDocumentStore::new()));
        let posts = repo.list_for(&session("user-1")).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn malformed_records_surface_as_parse_errors() {
        let store = Arc::new(MemoryDocumentStore::new());
        let repo = PostRepository::new(Arc::clone(&store) as _);
        store
            .set(COLLECTION, "bad", json!({ "user_id": "user-1" }), "tok")
            .await
            .unwrap();

        let result = repo.list_for(&session("user-1")).await;
        assert!(matches!(result, Err(crate::store::StoreError::Parse(_))));
    }
}
