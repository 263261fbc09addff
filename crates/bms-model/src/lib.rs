//! # bms-model
//!
//! Domain models for the BMS authentication core (Principal, Role).
//!
//! This crate defines the identity entities shared by the credential store,
//! the login state machine, and the authorization gate.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod principal;
pub mod role;

pub use principal::Principal;
pub use role::{Role, RoleSet};
