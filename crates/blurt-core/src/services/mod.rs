//! Use-case services.
//!
//! Services sit between the front-end state holders and the backend
//! clients: they validate input before anything touches the network,
//! check the session, and tag backend failures with the operation that
//! hit them.

mod account;
mod posts;

pub use account::{AccountService, SignUpOutcome};
pub use posts::PostService;
