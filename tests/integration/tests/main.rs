//! End-to-End Integration Tests
//!
//! These tests exercise the complete BMS authentication server over
//! HTTP, from registration through multi-factor login to role-gated
//! administration.

mod common;
mod auth_flows;
mod authorization;
mod mfa_flows;
mod transports;
