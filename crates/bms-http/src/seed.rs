//! Demo account seeding.
//!
//! Creates the well-known demo accounts when `BMS_SEED_DEMO_USERS` is
//! set. Accounts that already exist are left untouched, so seeding is
//! safe to run on every start. The admin account falls under the
//! default second-factor policy and is walked through TOTP enrollment
//! on first login.

use bms_auth::{AuthError, AuthService};
use bms_model::Role;

const DEMO_ACCOUNTS: &[(&str, &str, Role)] = &[
    ("owner@bms.com", "Owner123!", Role::StoreOwner),
    ("clerk@bms.com", "Clerk123!", Role::SalesClerk),
    ("admin@bms.com", "Admin123!", Role::SystemAdmin),
];

/// Registers the demo accounts, returning how many were created.
///
/// # Errors
///
/// Returns an error for any failure other than an account already
/// existing.
pub async fn seed_demo_accounts(service: &AuthService) -> anyhow::Result<usize> {
    let mut created = 0;

    for (identifier, password, role) in DEMO_ACCOUNTS {
        match service.register(identifier, password, Some(*role)).await {
            Ok(_) => {
                created += 1;
                tracing::info!(%identifier, role = role.as_str(), "seeded demo account");
            }
            Err(AuthError::DuplicateIdentifier { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(created)
}
