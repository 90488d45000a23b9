//! Error types for blurt-core

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type alias using blurt-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the use-case boundary.
///
/// Validation variants are raised before any backend request is made.
/// Backend failures are wrapped exactly once with the operation that
/// produced them, so callers can match on what failed while the source
/// chain keeps the underlying cause.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential input rejected before contacting the identity provider
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Post title is empty after trimming
    #[error("Post title cannot be empty")]
    EmptyTitle,

    /// Post content is empty after trimming
    #[error("Post content cannot be empty")]
    EmptyContent,

    /// Post id is empty after trimming
    #[error("Post ID cannot be empty")]
    EmptyPostId,

    /// No post with this id is visible to the caller
    #[error("Post not found: {0}")]
    PostNotFound(String),

    /// Operation requires a signed-in user
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Sign-in failed: {0}")]
    SignInFailed(#[source] AuthError),

    #[error("Sign-up failed: {0}")]
    SignUpFailed(#[source] AuthError),

    #[error("Sign-out failed: {0}")]
    SignOutFailed(#[source] AuthError),

    /// The session was established but the profile record could not be
    /// written; the session has been discarded again by the time this
    /// error is returned.
    #[error("Failed to save profile: {0}")]
    ProfileSaveFailed(#[source] StoreError),

    #[error("Failed to load profile: {0}")]
    ProfileLoadFailed(#[source] StoreError),

    #[error("Failed to fetch posts: {0}")]
    PostFetchFailed(#[source] StoreError),

    #[error("Failed to create post: {0}")]
    PostCreateFailed(#[source] StoreError),

    #[error("Failed to update post: {0}")]
    PostUpdateFailed(#[source] StoreError),

    #[error("Failed to delete post: {0}")]
    PostDeleteFailed(#[source] StoreError),
}
