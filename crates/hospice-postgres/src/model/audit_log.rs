use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::audit_logs;

/// Append-only record of a security-relevant change.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditLog {
    pub id: Uuid,
    pub agency_id: Option<Uuid>,
    pub actor_id: Option<Uuid>,
    /// Dotted action name, such as `invitation.revoke`.
    pub action: String,
    pub resource: String,
    pub resource_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAuditLog {
    pub agency_id: Option<Uuid>,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<Uuid>,
    pub metadata: serde_json::Value,
}

impl NewAuditLog {
    /// Creates an entry with empty metadata.
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            agency_id: None,
            actor_id: None,
            action: action.into(),
            resource: resource.into(),
            resource_id: None,
            metadata: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn agency(mut self, agency_id: Uuid) -> Self {
        self.agency_id = Some(agency_id);
        self
    }

    pub fn actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn target(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        if metadata.is_object() {
            self.metadata = metadata;
        }
        self
    }
}
