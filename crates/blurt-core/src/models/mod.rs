//! Data models for Blurt

pub mod post;
pub mod profile;

pub use post::Post;
pub use profile::UserProfile;
