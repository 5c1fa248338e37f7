//! Per-browser session state.
//!
//! A session is identified by an opaque id carried in an encrypted cookie. It owns at most one
//! Google [`Credential`] and the chat console transcript.

mod context;
mod credential;
mod pending;
mod store;

pub use context::SessionContext;
pub use credential::Credential;
pub use pending::{PendingAuthorization, PendingAuthorizations};
pub use store::SessionStore;
