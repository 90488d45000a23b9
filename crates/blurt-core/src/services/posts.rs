//! Post use cases: fetch, create, update, delete.

use std::sync::Arc;

use crate::auth::Session;
use crate::error::{Error, Result};
use crate::models::Post;
use crate::session::SessionHandle;
use crate::store::{DocumentStore, PostRepository};
use crate::util::unix_timestamp_ms;

/// Orchestrates post operations for the signed-in user.
///
/// Every operation validates its input first, then requires a live
/// session. Updates and deletes re-check ownership against the stored
/// record; a post that is missing or belongs to someone else is the same
/// "not found" from the caller's point of view.
#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
    sessions: SessionHandle,
}

impl PostService {
    pub fn new(store: Arc<dyn DocumentStore>, sessions: SessionHandle) -> Self {
        Self {
            posts: PostRepository::new(store),
            sessions,
        }
    }

    /// Lists the signed-in user's posts, newest first.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let session = self.require_session()?;
        self.posts
            .list_for(&session)
            .await
            .map_err(Error::PostFetchFailed)
    }

    /// Loads one owned post by id.
    pub async fn get_post(&self, id: &str) -> Result<Post> {
        let id = normalize_post_id(id)?;
        let session = self.require_session()?;
        self.posts
            .get(&id, &session)
            .await
            .map_err(Error::PostFetchFailed)?
            .filter(|post| post.user_id == session.user_id)
            .ok_or(Error::PostNotFound(id))
    }

    /// Creates a post stamped with the current time.
    pub async fn create_post(&self, title: &str, content: &str) -> Result<Post> {
        let fields = validate_post_fields(title, content)?;
        let session = self.require_session()?;
        let post = Post::new(fields.title, fields.content, session.user_id.clone());
        let created = self
            .posts
            .create(&post, &session)
            .await
            .map_err(Error::PostCreateFailed)?;
        tracing::debug!("Created post {:?}", created.id);
        Ok(created)
    }

    /// Replaces the title and content of an owned post, restamping its
    /// timestamp.
    pub async fn update_post(&self, id: &str, title: &str, content: &str) -> Result<Post> {
        let fields = validate_post_fields(title, content)?;
        let id = normalize_post_id(id)?;
        let session = self.require_session()?;

        let existing = self
            .posts
            .get(&id, &session)
            .await
            .map_err(Error::PostUpdateFailed)?
            .filter(|post| post.user_id == session.user_id)
            .ok_or_else(|| Error::PostNotFound(id.clone()))?;

        let updated = Post {
            id: Some(id.clone()),
            title: fields.title,
            content: fields.content,
            timestamp: unix_timestamp_ms(),
            user_id: existing.user_id,
        };
        self.posts
            .set(&id, &updated, &session)
            .await
            .map_err(Error::PostUpdateFailed)?;
        tracing::debug!("Updated post {id}");
        Ok(updated)
    }

    /// Deletes an owned post.
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        let id = normalize_post_id(id)?;
        let session = self.require_session()?;

        let owned = self
            .posts
            .get(&id, &session)
            .await
            .map_err(Error::PostDeleteFailed)?
            .is_some_and(|post| post.user_id == session.user_id);
        if !owned {
            return Err(Error::PostNotFound(id));
        }

        self.posts
            .delete(&id, &session)
            .await
            .map_err(Error::PostDeleteFailed)?;
        tracing::debug!("Deleted post {id}");
        Ok(())
    }

    fn require_session(&self) -> Result<Session> {
        self.sessions.current().ok_or(Error::Unauthenticated)
    }
}

struct PostFields {
    title: String,
    content: String,
}

/// Title is checked before content; both must be non-empty after
/// trimming.
fn validate_post_fields(title: &str, content: &str) -> Result<PostFields> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }
    Ok(PostFields {
        title: title.to_string(),
        content: content.to_string(),
    })
}

fn normalize_post_id(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::EmptyPostId);
    }
    Ok(id.to_string())
}
