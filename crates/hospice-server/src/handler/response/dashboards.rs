//! Dashboard and audit response types.

use hospice_postgres::model;
use hospice_postgres::query::{AnalyticsMetrics, ComplianceMetrics};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Count of rows sharing one status or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Status or type in its wire form, such as `in_transit`.
    pub status: String,
    pub count: i64,
}

fn status_counts<T: ToString>(rows: Vec<(T, i64)>) -> Vec<StatusCount> {
    rows.into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}

/// Care-quality indicators of an agency.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    pub agency_id: Uuid,
    pub window_days: i64,
    pub active_patients: i64,
    /// Active patients without a completed visit in the window.
    pub patients_without_recent_visit: Vec<Uuid>,
    pub missed_visits: i64,
    /// Supply requests pending for more than 48 hours.
    pub overdue_supply_requests: i64,
    /// Deliveries that ended in an exception.
    pub delivery_exceptions: i64,
    pub generated_at: Timestamp,
}

impl Compliance {
    pub fn new(agency_id: Uuid, window_days: i64, metrics: ComplianceMetrics) -> Self {
        Self {
            agency_id,
            window_days,
            active_patients: metrics.active_patients,
            patients_without_recent_visit: metrics.patients_without_recent_visit,
            missed_visits: metrics.missed_visits,
            overdue_supply_requests: metrics.overdue_supply_requests,
            delivery_exceptions: metrics.delivery_exceptions,
            generated_at: Timestamp::now(),
        }
    }
}

/// Activity breakdown of an agency.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub agency_id: Uuid,
    pub window_days: i64,
    pub visits_by_status: Vec<StatusCount>,
    pub visits_by_type: Vec<StatusCount>,
    pub deliveries_by_status: Vec<StatusCount>,
    pub supply_requests_by_status: Vec<StatusCount>,
    pub direct_messages: i64,
    pub thread_messages: i64,
    pub generated_at: Timestamp,
}

impl Analytics {
    pub fn new(agency_id: Uuid, window_days: i64, metrics: AnalyticsMetrics) -> Self {
        Self {
            agency_id,
            window_days,
            visits_by_status: status_counts(metrics.visits_by_status),
            visits_by_type: status_counts(metrics.visits_by_type),
            deliveries_by_status: status_counts(metrics.deliveries_by_status),
            supply_requests_by_status: status_counts(metrics.supply_requests_by_status),
            direct_messages: metrics.direct_messages,
            thread_messages: metrics.thread_messages,
            generated_at: Timestamp::now(),
        }
    }
}

/// One audit log entry.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub entry_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<model::AuditLog> for AuditEntry {
    fn from(entry: model::AuditLog) -> Self {
        Self {
            entry_id: entry.id,
            actor_id: entry.actor_id,
            action: entry.action,
            resource: entry.resource,
            resource_id: entry.resource_id,
            metadata: entry.metadata,
            created_at: entry.created_at.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use hospice_postgres::types::{DeliveryStatus, VisitStatus};

    use super::*;

    #[test]
    fn counts_use_wire_names() {
        let analytics = Analytics::new(
            Uuid::nil(),
            30,
            AnalyticsMetrics {
                visits_by_status: vec![(VisitStatus::Completed, 4), (VisitStatus::Missed, 1)],
                deliveries_by_status: vec![(DeliveryStatus::InTransit, 2)],
                ..Default::default()
            },
        );

        assert_eq!(analytics.visits_by_status[1].status, "missed");
        assert_eq!(analytics.deliveries_by_status[0].status, "in_transit");
        assert!(analytics.visits_by_type.is_empty());
    }
}
