//! # bms-core
//!
//! Core error, configuration, and audit event types for the BMS
//! authentication core.
//!
//! This crate provides the foundation shared by every other `bms-*` crate:
//! the generic error type, the declarative auth policy configuration, and
//! the structured security event log.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::AuthConfig;
pub use error::{Error, Result};
