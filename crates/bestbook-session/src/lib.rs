//! The client-held authentication record for Bestbook.
//!
//! This crate owns two things:
//!
//! 1. **The record** ([`Session`], [`Profile`]): the bearer token, the
//!    server-assigned session id, and display attributes for the header.
//! 2. **The store** ([`SessionStore`], [`MemorySessionStore`]): the one
//!    shared, observable slot that holds the record while the user is
//!    signed in.
//!
//! # How it fits in the stack
//!
//! ```text
//! Lifecycle layer (above)  ← reads snapshots every tick, clears on sign-out
//!     ↕
//! Session layer (this crate)  ← holds {token, session id, profile}
//!     ↕
//! Sign-in flow (external)  ← populates the store
//! ```

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{Profile, Session};
pub use store::{MemorySessionStore, SessionStore};
