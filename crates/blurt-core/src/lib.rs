//! blurt-core - Core library for Blurt
//!
//! Everything the front ends (CLI today, app shells later) share:
//! models, the identity provider and document store clients, the
//! session handle, use-case services, and per-screen state holders.
//!
//! A front end wires it up roughly like this: build an
//! [`auth::AuthClient`] and a [`store::RestDocumentStore`] for the
//! configured backend, hand both to the services together with one
//! [`SessionHandle`], and render from the state holders' snapshots.

pub mod auth;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{Post, UserProfile};
pub use session::SessionHandle;
