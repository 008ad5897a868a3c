//! Password hashing, password strength, session keys and invitation tokens.

mod invitation_token;
mod password_hasher;
mod password_strength;
mod session_keys;

pub use invitation_token::generate_invitation_token;
pub use password_hasher::PasswordHasher;
pub use password_strength::{MIN_PASSWORD_SCORE, PasswordEvaluation, PasswordStrength};
pub use session_keys::{SessionKeys, SessionKeysConfig};
