//! # bms-session
//!
//! Server-side session state for the BMS authentication core.
//!
//! Two kinds of record live here: the [`Session`] issued by the
//! session-cookie transport once authentication completes, and the
//! [`PendingMfa`] ticket that bridges the gap between a successful
//! password check and a successful TOTP check. Both are reached through
//! injected store traits so the in-memory implementations can be swapped
//! for a distributed store.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod pending;
pub mod provider;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use memory::{InMemoryPendingMfaStore, InMemorySessionStore};
pub use pending::PendingMfa;
pub use provider::{PendingMfaStore, SessionStore};
pub use session::Session;
