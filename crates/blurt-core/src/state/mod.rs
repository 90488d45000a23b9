//! Front-end state holders.
//!
//! Each screen owns a state holder that publishes immutable snapshots
//! through a `tokio::sync::watch` channel. Front ends render from
//! snapshots and subscribe for changes; they never mutate state
//! directly.

mod login;
mod posts;

pub use login::{LoginFlow, LoginPhase, LoginState};
pub use posts::{PostFeed, PostFeedState};
