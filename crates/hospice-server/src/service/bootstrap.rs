//! Startup creation of the platform super admin.

use hospice_postgres::model::NewAccount;
use hospice_postgres::query::AccountRepository;
use hospice_postgres::types::{AccountRole, OnboardingStep};
use uuid::Uuid;

use super::{BootstrapConfig, ServiceState};
use crate::{Error, Result};

const TRACING_TARGET: &str = "hospice_server::service::bootstrap";

/// Creates the configured super admin unless an account with that email exists.
///
/// Returns the id of the created account, or `None` when nothing was
/// configured or the account was already there.
pub async fn bootstrap_super_admin(
    state: &ServiceState,
    config: &BootstrapConfig,
) -> Result<Option<Uuid>> {
    let Some((email, password)) = config.credentials() else {
        tracing::debug!(target: TRACING_TARGET, "no bootstrap super admin configured");
        return Ok(None);
    };

    let email = email.trim().to_lowercase();
    let mut conn = state.postgres.get_connection().await.map_err(|e| {
        Error::internal("bootstrap", "Failed to acquire a database connection").with_source(e)
    })?;

    let existing = conn.find_account_by_email(&email).await.map_err(|e| {
        Error::internal("bootstrap", "Failed to look up the bootstrap account").with_source(e)
    })?;

    if let Some(account) = existing {
        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            role = %account.role,
            "bootstrap account already exists"
        );
        return Ok(None);
    }

    let password_hash = state
        .password_hasher
        .hash_password(password)
        .map_err(|e| Error::internal("bootstrap", e.to_string()))?;

    let account = conn
        .create_account(NewAccount {
            email,
            password_hash: Some(password_hash),
            display_name: config.bootstrap_admin_name.clone(),
            role: AccountRole::SuperAdmin,
            onboarding_step: OnboardingStep::OnboardingCompleted,
        })
        .await
        .map_err(|e| {
            Error::internal("bootstrap", "Failed to create the bootstrap account").with_source(e)
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "bootstrap super admin created"
    );

    Ok(Some(account.id))
}
