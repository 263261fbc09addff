//! # bms-store
//!
//! Credential store interface for the BMS authentication core.
//!
//! The store is an injected capability: the auth logic only ever sees the
//! [`CredentialStore`] trait, so the in-memory implementation here can be
//! swapped for a persistent backing without touching the login protocol.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod provider;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryCredentialStore;
pub use provider::CredentialStore;
