//! Post-authentication redirect decision.

use hospice_postgres::model::Account;
use hospice_postgres::types::AccountRole;

use super::OnboardingProgress;

/// Page for signing in.
pub const SIGNIN_PATH: &str = "/signin";

/// Everything the redirect decision looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallbackContext<'a> {
    /// Error reported by the identity flow.
    pub error: Option<&'a str>,
    /// Authenticated account, if the request carried a valid session.
    pub account: Option<&'a Account>,
    /// Token of a pending invitation addressed to the account's email.
    pub pending_invitation: Option<&'a str>,
    /// Page the client asked to land on.
    pub next: Option<&'a str>,
}

/// Returns the path the client should be sent to.
///
/// Checked in order: identity errors, missing authentication, password
/// setup, pending invitations, then the role landing page. `next` only
/// replaces the role landing page and only when it is a local path.
pub fn callback_location(context: CallbackContext<'_>) -> String {
    if let Some(error) = context.error {
        let encoded: String = url::form_urlencoded::byte_serialize(error.as_bytes()).collect();
        return format!("{SIGNIN_PATH}?error={encoded}");
    }

    let Some(account) = context.account else {
        return SIGNIN_PATH.to_owned();
    };

    let progress = OnboardingProgress::of(account);
    if progress.needs_password() {
        return "/onboarding/password".to_owned();
    }

    if let Some(token) = context.pending_invitation {
        return format!("/invitations/{token}");
    }

    if let Some(next) = context.next.filter(|next| is_local_path(next)) {
        return next.to_owned();
    }

    match account.role {
        AccountRole::SuperAdmin => "/super-admin",
        AccountRole::AgencyAdmin if !progress.is_completed() => "/onboarding",
        AccountRole::AgencyAdmin => "/admin",
        AccountRole::Staff => "/staff",
        AccountRole::Family => "/family",
    }
    .to_owned()
}

/// Accepts `/path` but not `//host` or `/\host`, which browsers treat as
/// another origin.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

#[cfg(test)]
mod tests {
    use hospice_postgres::types::OnboardingStep;
    use uuid::Uuid;

    use super::*;

    fn account(role: AccountRole, step: OnboardingStep, has_password: bool) -> Account {
        let now = jiff::Timestamp::now();
        Account {
            id: Uuid::new_v4(),
            email: "someone@example.org".into(),
            password_hash: has_password.then(|| "$argon2id$hash".to_owned()),
            display_name: "Someone".into(),
            role,
            onboarding_step: step,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    fn completed(role: AccountRole) -> Account {
        account(role, OnboardingStep::OnboardingCompleted, true)
    }

    #[test]
    fn error_goes_to_signin_with_message() {
        let staff = completed(AccountRole::Staff);
        let location = callback_location(CallbackContext {
            error: Some("link expired"),
            account: Some(&staff),
            ..Default::default()
        });
        assert_eq!(location, "/signin?error=link+expired");
    }

    #[test]
    fn anonymous_goes_to_signin() {
        assert_eq!(callback_location(CallbackContext::default()), "/signin");
    }

    #[test]
    fn password_setup_comes_before_invitations() {
        let family = account(AccountRole::Family, OnboardingStep::NeedsPasswordSetup, false);
        let location = callback_location(CallbackContext {
            account: Some(&family),
            pending_invitation: Some("abc"),
            next: Some("/family/visits"),
            ..Default::default()
        });
        assert_eq!(location, "/onboarding/password");
    }

    #[test]
    fn pending_invitation_beats_next() {
        let staff = completed(AccountRole::Staff);
        let location = callback_location(CallbackContext {
            account: Some(&staff),
            pending_invitation: Some("tok"),
            next: Some("/staff/patients"),
            ..Default::default()
        });
        assert_eq!(location, "/invitations/tok");
    }

    #[test]
    fn role_landing_pages() {
        let cases = [
            (completed(AccountRole::SuperAdmin), "/super-admin"),
            (completed(AccountRole::AgencyAdmin), "/admin"),
            (
                account(AccountRole::AgencyAdmin, OnboardingStep::FacilityConfigured, true),
                "/onboarding",
            ),
            (completed(AccountRole::Staff), "/staff"),
            (completed(AccountRole::Family), "/family"),
        ];

        for (account, expected) in cases {
            let context = CallbackContext {
                account: Some(&account),
                ..Default::default()
            };
            assert_eq!(callback_location(context), expected);
        }
    }

    #[test]
    fn only_local_next_overrides_landing() {
        let family = completed(AccountRole::Family);

        for (next, expected) in [
            ("/family/deliveries", "/family/deliveries"),
            ("//evil.example", "/family"),
            ("https://evil.example", "/family"),
            ("/\\evil.example", "/family"),
        ] {
            let context = CallbackContext {
                account: Some(&family),
                next: Some(next),
                ..Default::default()
            };
            assert_eq!(callback_location(context), expected, "{next}");
        }
    }
}
