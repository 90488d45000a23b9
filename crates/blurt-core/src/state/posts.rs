//! Post screen state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Error;
use crate::models::Post;
use crate::services::{AccountService, PostService};

/// Snapshot of the post screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFeedState {
    /// The signed-in user's posts, newest first.
    pub posts: Vec<Post>,
    pub loading: bool,
    /// User-facing message from the last failed operation; cleared when
    /// a new operation starts.
    pub error: Option<String>,
}

/// Drives the post screen against [`PostService`].
///
/// Mutations go through the service and then refetch the whole list, so
/// the snapshot always mirrors what the store holds rather than a
/// locally patched copy. Sign-out is delegated to [`AccountService`];
/// this holder only empties its own list.
pub struct PostFeed {
    posts: Arc<PostService>,
    accounts: Arc<AccountService>,
    state: watch::Sender<PostFeedState>,
}

impl PostFeed {
    #[must_use]
    pub fn new(posts: Arc<PostService>, accounts: Arc<AccountService>) -> Self {
        Self {
            posts,
            accounts,
            state: watch::Sender::new(PostFeedState::default()),
        }
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PostFeedState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PostFeedState {
        self.state.borrow().clone()
    }

    /// Reloads the list from the store.
    pub async fn refresh(&self) {
        self.begin();
        self.finish_with_reload().await;
    }

    /// Creates a post, then reloads the list.
    pub async fn create(&self, title: &str, content: &str) {
        self.begin();
        match self.posts.create_post(title, content).await {
            Ok(_) => self.finish_with_reload().await,
            Err(error) => self.fail(&error),
        }
    }

    /// Updates a post, then reloads the list.
    pub async fn update(&self, id: &str, title: &str, content: &str) {
        self.begin();
        match self.posts.update_post(id, title, content).await {
            Ok(_) => self.finish_with_reload().await,
            Err(error) => self.fail(&error),
        }
    }

    /// Deletes a post, then reloads the list.
    pub async fn delete(&self, id: &str) {
        self.begin();
        match self.posts.delete_post(id).await {
            Ok(()) => self.finish_with_reload().await,
            Err(error) => self.fail(&error),
        }
    }

    /// Signs the user out and empties the list.
    pub async fn sign_out(&self) {
        self.begin();
        match self.accounts.sign_out().await {
            Ok(()) => self.state.send_modify(|state| {
                state.loading = false;
                state.posts.clear();
            }),
            Err(error) => self.fail(&error),
        }
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.error = None;
            state.loading = true;
        });
    }

    fn fail(&self, error: &Error) {
        self.state.send_modify(|state| {
            state.loading = false;
            state.error = Some(error.to_string());
        });
    }

    async fn finish_with_reload(&self) {
        let result = self.posts.fetch_posts().await;
        self.state.send_modify(|state| {
            state.loading = false;
            match result {
                Ok(posts) => state.posts = posts,
                Err(error) => state.error = Some(error.to_string()),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::{AuthResult, IdentityProvider, Session};
    use crate::session::SessionHandle;
    use crate::store::MemoryDocumentStore;
    use crate::util::unix_timestamp_now;

    /// Provider that only has to handle sign-out in these tests.
    #[derive(Default)]
    struct RevokeCounter {
        revocations: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for RevokeCounter {
        async fn sign_in(&self, _email: &str, _password: &str) -> AuthResult<Session> {
            panic!("feed tests establish sessions directly")
        }

        async fn sign_up(&self, _email: &str, _password: &str) -> AuthResult<Option<Session>> {
            panic!("feed tests establish sessions directly")
        }

        async fn sign_out(&self, _access_token: &str) -> AuthResult<()> {
            self.revocations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        feed: PostFeed,
        sessions: SessionHandle,
        provider: Arc<RevokeCounter>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryDocumentStore::new());
        let sessions = SessionHandle::new();
        let provider = Arc::new(RevokeCounter::default());
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&provider) as _,
            Arc::clone(&store) as _,
            sessions.clone(),
        ));
        let posts = Arc::new(PostService::new(Arc::clone(&store) as _, sessions.clone()));
        Fixture {
            feed: PostFeed::new(posts, accounts),
            sessions,
            provider,
        }
    }

    fn signed_in_fixture(user_id: &str) -> Fixture {
        let fixture = fixture();
        fixture
            .sessions
            .establish(Session {
                user_id: user_id.to_string(),
                email: None,
                access_token: "tok".to_string(),
                expires_at: unix_timestamp_now() + 3600,
            })
            .unwrap();
        fixture
    }

    #[tokio::test]
    async fn refresh_while_signed_out_surfaces_the_error() {
        let fixture = fixture();
        fixture.feed.refresh().await;

        let state = fixture.feed.snapshot();
        assert!(!state.loading);
        assert!(state.posts.is_empty());
        assert!(state.error.as_deref().unwrap().contains("Not signed in"));
    }

    #[tokio::test]
    async fn create_reloads_the_list_from_the_store() {
        let fixture = signed_in_fixture("user-1");

        fixture.feed.create("First", "Content").await;
        fixture.feed.create("Second", "Content").await;

        let state = fixture.feed.snapshot();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.posts.len(), 2);
        assert!(state.posts.iter().all(|post| post.user_id == "user-1"));
    }

    #[tokio::test]
    async fn invalid_input_sets_the_error_and_keeps_the_list() {
        let fixture = signed_in_fixture("user-1");
        fixture.feed.create("Keep me", "Content").await;

        fixture.feed.create("   ", "Content").await;

        let state = fixture.feed.snapshot();
        assert_eq!(
            state.error.as_deref(),
            Some("Post title cannot be empty")
        );
        assert_eq!(state.posts.len(), 1);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn update_and_delete_round_trip_through_the_store() {
        let fixture = signed_in_fixture("user-1");
        fixture.feed.create("Original", "Content").await;
        let id = fixture.feed.snapshot().posts[0].id.clone().unwrap();

        fixture.feed.update(&id, "Edited", "New content").await;
        let state = fixture.feed.snapshot();
        assert_eq!(state.posts[0].title, "Edited");
        assert_eq!(state.error, None);

        fixture.feed.delete(&id).await;
        assert!(fixture.feed.snapshot().posts.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_foreign_post_reports_not_found() {
        let fixture = signed_in_fixture("user-1");
        fixture.feed.delete("not-mine").await;

        let state = fixture.feed.snapshot();
        assert!(state.error.as_deref().unwrap().starts_with("Post not found"));
    }

    #[tokio::test]
    async fn next_operation_clears_a_stale_error() {
        let fixture = signed_in_fixture("user-1");
        fixture.feed.create("", "").await;
        assert!(fixture.feed.snapshot().error.is_some());

        fixture.feed.refresh().await;
        assert_eq!(fixture.feed.snapshot().error, None);
    }

    #[tokio::test]
    async fn sign_out_revokes_the_session_and_empties_the_list() {
        let fixture = signed_in_fixture("user-1");
        fixture.feed.create("Gone soon", "Content").await;

        fixture.feed.sign_out().await;

        let state = fixture.feed.snapshot();
        assert!(state.posts.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert!(!fixture.sessions.is_authenticated());
        assert_eq!(fixture.provider.revocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn subscribers_observe_list_changes() {
        let fixture = signed_in_fixture("user-1");
        let mut receiver = fixture.feed.subscribe();

        fixture.feed.create("Watched", "Content").await;

        assert!(receiver.has_changed().unwrap());
        let seen = receiver.borrow_and_update().clone();
        assert_eq!(seen.posts.len(), 1);
        assert_eq!(seen, fixture.feed.snapshot());
    }
}
