//! Password strength evaluation with zxcvbn.

use zxcvbn::feedback::Feedback;
use zxcvbn::zxcvbn;

use crate::handler::{ErrorKind, Result};

const TRACING_TARGET: &str = "hospice_server::service::password_strength";

/// Default minimum zxcvbn score a new password must reach.
pub const MIN_PASSWORD_SCORE: u8 = 3;

/// Rejects passwords whose zxcvbn score is below a minimum.
#[derive(Debug, Clone)]
pub struct PasswordStrength {
    min_score: u8,
}

/// Score and feedback for one password.
#[derive(Debug, Clone)]
pub struct PasswordEvaluation {
    /// Score from 0 (weakest) to 4 (strongest).
    pub score: u8,
    pub warning: Option<String>,
    pub suggestions: Vec<String>,
}

impl PasswordStrength {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn with_min_score(min_score: u8) -> Self {
        Self { min_score }
    }

    /// Scores `password`, penalizing any of `user_inputs` (email, name) it contains.
    pub fn evaluate(&self, password: &str, user_inputs: &[&str]) -> PasswordEvaluation {
        let entropy = zxcvbn(password, user_inputs);
        let (warning, suggestions) = entropy
            .feedback()
            .map(Self::convert_feedback)
            .unwrap_or_default();

        PasswordEvaluation {
            score: entropy.score().into(),
            warning,
            suggestions,
        }
    }

    /// Returns 400 with zxcvbn's feedback when the password is too weak.
    pub fn validate_password(&self, password: &str, user_inputs: &[&str]) -> Result<()> {
        let evaluation = self.evaluate(password, user_inputs);

        if evaluation.score >= self.min_score {
            tracing::debug!(target: TRACING_TARGET, score = evaluation.score, "password accepted");
            return Ok(());
        }

        tracing::debug!(
            target: TRACING_TARGET,
            score = evaluation.score,
            min_score = self.min_score,
            "password rejected: insufficient strength"
        );

        let mut error = ErrorKind::BadRequest
            .with_message("Password does not meet minimum strength requirements")
            .with_resource("password");

        if let Some(warning) = evaluation.warning {
            error = error.with_context(warning);
        }

        if !evaluation.suggestions.is_empty() {
            error = error.with_suggestion(evaluation.suggestions.join("; "));
        }

        Err(error)
    }

    fn convert_feedback(feedback: &Feedback) -> (Option<String>, Vec<String>) {
        let warning = feedback.warning().map(|w| w.to_string());
        let suggestions = feedback.suggestions().iter().map(|s| s.to_string()).collect();
        (warning, suggestions)
    }
}

impl Default for PasswordStrength {
    #[inline]
    fn default() -> Self {
        Self::with_min_score(MIN_PASSWORD_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_password_is_rejected() {
        let checker = PasswordStrength::new();
        let error = checker.validate_password("password", &[]).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("password"));
    }

    #[test]
    fn strong_password_is_accepted() {
        let checker = PasswordStrength::new();
        assert!(checker.validate_password("kX9$mP2#vL5@wQ8!", &[]).is_ok());
    }

    #[test]
    fn personal_words_lower_the_score() {
        let checker = PasswordStrength::new();
        let evaluation = checker.evaluate("margaret1950", &["margaret", "1950"]);
        assert!(evaluation.score < MIN_PASSWORD_SCORE);
    }

    #[test]
    fn lenient_minimum_accepts_anything() {
        let lenient = PasswordStrength::with_min_score(0);
        assert!(lenient.validate_password("password", &[]).is_ok());
    }
}
