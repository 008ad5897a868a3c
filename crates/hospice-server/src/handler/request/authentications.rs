//! Sign-in and auth callback request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for signing in with a password.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Signin {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email_address: String,

    /// Account password.
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Query parameters of the post-authentication callback.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallbackQuery {
    /// Error reported by the identity flow, shown on the sign-in page.
    pub error: Option<String>,

    /// Local path to land on after authentication.
    pub next: Option<String>,
}
