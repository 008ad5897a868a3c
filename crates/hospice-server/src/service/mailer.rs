//! Invitation emails.
//!
//! Sending never fails the request that triggered it: errors are logged
//! and the caller learns only whether the email went out.

use hospice_postgres::model::Invitation;
use hospice_postgres::types::InvitationKind;
use hospice_relay::{Email, EmailClient};

use super::PortalSettings;

const TRACING_TARGET: &str = "hospice_server::service::mailer";

/// Sends the invitation link to the invitee. Returns whether it was sent.
pub async fn send_invitation_email(
    email_client: &EmailClient,
    settings: &PortalSettings,
    invitation: &Invitation,
    agency_name: Option<&str>,
) -> bool {
    let link = settings.invitation_link(&invitation.token);
    let organization = agency_name.unwrap_or("a hospice agency");

    let (subject, intro) = match invitation.kind {
        InvitationKind::Facility => (
            "Set up your hospice agency".to_owned(),
            "You have been invited to set up your agency on the family portal.".to_owned(),
        ),
        InvitationKind::Team => (
            format!("Join {organization} on the family portal"),
            format!("You have been invited to join the care team at {organization}."),
        ),
        InvitationKind::Family => (
            format!("{organization} invited you to the family portal"),
            "You have been invited to follow your loved one's care, visits and deliveries."
                .to_owned(),
        ),
    };

    let expires = jiff::Timestamp::from(invitation.expires_at);
    let text = format!(
        "{intro}\n\nAccept the invitation: {link}\n\nThis link expires on {}.",
        expires.strftime("%B %-d, %Y")
    );
    let html = format!(
        "<p>{intro}</p><p><a href=\"{link}\">Accept the invitation</a></p>\
         <p>This link expires on {}.</p>",
        expires.strftime("%B %-d, %Y")
    );

    let email = Email::new(&invitation.email, subject)
        .with_text(text)
        .with_html(html);

    match email_client.send(&email).await {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET,
                invitation_id = %invitation.id,
                kind = %invitation.kind,
                "invitation email sent"
            );
            true
        }
        Err(error) if error.is_disabled() => {
            tracing::debug!(
                target: TRACING_TARGET,
                invitation_id = %invitation.id,
                "email relay disabled, invitation email skipped"
            );
            false
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                invitation_id = %invitation.id,
                error = %error,
                "failed to send invitation email"
            );
            false
        }
    }
}
