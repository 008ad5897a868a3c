//! Message thread request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

/// Request payload to start a thread.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateThread {
    /// Thread subject (1-200 characters).
    #[validate(length(min = 1, max = 200))]
    #[validate(custom(function = "not_blank"))]
    pub subject: String,

    /// Patient the conversation is about.
    pub patient_id: Option<Uuid>,

    /// Accounts to add besides the creator (1-50).
    #[validate(length(min = 1, max = 50))]
    pub participant_ids: Vec<Uuid>,

    /// Optional first message.
    #[validate(length(min = 1, max = 4000))]
    #[validate(custom(function = "not_blank"))]
    pub body: Option<String>,
}

impl CreateThread {
    /// Participants including `creator`, without duplicates, in request order.
    pub fn participants(&self, creator: Uuid) -> Vec<Uuid> {
        let mut participants = vec![creator];
        for id in &self.participant_ids {
            if !participants.contains(id) {
                participants.push(*id);
            }
        }
        participants
    }
}

/// Request payload to post in a thread.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostThreadMessage {
    /// Message text (1-4000 characters).
    #[validate(length(min = 1, max = 4000))]
    #[validate(custom(function = "not_blank"))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_is_always_first_and_unique() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        let request = CreateThread {
            subject: "Weekend coverage".to_owned(),
            patient_id: None,
            participant_ids: vec![other, creator, other],
            body: None,
        };

        assert_eq!(request.participants(creator), vec![creator, other]);
    }
}
