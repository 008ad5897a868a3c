//! Aggregates behind the compliance, analytics and platform dashboards.

use std::collections::HashSet;
use std::future::Future;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::{Timestamp, ToSpan};
use uuid::Uuid;

use crate::types::{
    AccountRole, DeliveryStatus, PatientStatus, SupplyRequestStatus, VisitStatus, VisitType,
};
use crate::{PgConnection, PgError, PgResult, schema};

/// Days without a completed visit before a patient is flagged.
const VISIT_GAP_DAYS: i64 = 14;

/// Hours a supply request may wait before it counts as overdue.
const PENDING_SUPPLY_HOURS: i64 = 48;

/// Care-quality indicators for one agency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplianceMetrics {
    pub active_patients: i64,
    /// Active patients with no completed visit in the last 14 days.
    pub patients_without_recent_visit: Vec<Uuid>,
    pub missed_visits: i64,
    /// Supply requests still pending after 48 hours.
    pub overdue_supply_requests: i64,
    pub delivery_exceptions: i64,
}

/// Activity breakdown for one agency over a reporting window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsMetrics {
    pub visits_by_status: Vec<(VisitStatus, i64)>,
    pub visits_by_type: Vec<(VisitType, i64)>,
    pub deliveries_by_status: Vec<(DeliveryStatus, i64)>,
    pub supply_requests_by_status: Vec<(SupplyRequestStatus, i64)>,
    pub direct_messages: i64,
    pub thread_messages: i64,
}

/// Platform-wide counts for super-admins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformOverview {
    pub agencies: i64,
    pub accounts_by_role: Vec<(AccountRole, i64)>,
    pub active_patients: i64,
}

/// Read-only aggregate queries.
pub trait DashboardRepository {
    /// Computes compliance indicators. Visit and delivery windows cover the
    /// last `window_days` days.
    fn compliance_metrics(
        &mut self,
        agency_id: Uuid,
        window_days: i64,
    ) -> impl Future<Output = PgResult<ComplianceMetrics>> + Send;

    fn analytics_metrics(
        &mut self,
        agency_id: Uuid,
        window_days: i64,
    ) -> impl Future<Output = PgResult<AnalyticsMetrics>> + Send;

    fn platform_overview(&mut self) -> impl Future<Output = PgResult<PlatformOverview>> + Send;
}

fn days_ago(days: i64) -> jiff_diesel::Timestamp {
    let now = Timestamp::now();
    now.checked_sub((days * 24).hours()).unwrap_or(now).into()
}

impl DashboardRepository for PgConnection {
    async fn compliance_metrics(
        &mut self,
        agency: Uuid,
        window_days: i64,
    ) -> PgResult<ComplianceMetrics> {
        use schema::{deliveries, patients, supply_requests, visits};

        let active: Vec<Uuid> = patients::table
            .filter(patients::agency_id.eq(agency))
            .filter(patients::status.eq(PatientStatus::Active))
            .select(patients::id)
            .load(self)
            .await
            .map_err(PgError::from)?;

        let visited: HashSet<Uuid> = visits::table
            .filter(visits::agency_id.eq(agency))
            .filter(visits::status.eq(VisitStatus::Completed))
            .filter(visits::completed_at.ge(days_ago(VISIT_GAP_DAYS)))
            .select(visits::patient_id)
            .distinct()
            .load::<Uuid>(self)
            .await
            .map_err(PgError::from)?
            .into_iter()
            .collect();

        let missed_visits = visits::table
            .filter(visits::agency_id.eq(agency))
            .filter(visits::status.eq(VisitStatus::Missed))
            .filter(visits::scheduled_at.ge(days_ago(window_days)))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let overdue_cutoff = {
            let now = Timestamp::now();
            jiff_diesel::Timestamp::from(
                now.checked_sub(PENDING_SUPPLY_HOURS.hours()).unwrap_or(now),
            )
        };
        let overdue_supply_requests = supply_requests::table
            .filter(supply_requests::agency_id.eq(agency))
            .filter(supply_requests::status.eq(SupplyRequestStatus::Pending))
            .filter(supply_requests::created_at.lt(overdue_cutoff))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let delivery_exceptions = deliveries::table
            .filter(deliveries::agency_id.eq(agency))
            .filter(deliveries::status.eq(DeliveryStatus::Exception))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(ComplianceMetrics {
            active_patients: active.len() as i64,
            patients_without_recent_visit: active
                .into_iter()
                .filter(|patient| !visited.contains(patient))
                .collect(),
            missed_visits,
            overdue_supply_requests,
            delivery_exceptions,
        })
    }

    async fn analytics_metrics(
        &mut self,
        agency: Uuid,
        window_days: i64,
    ) -> PgResult<AnalyticsMetrics> {
        use schema::{deliveries, message_threads, messages, supply_requests, thread_messages, visits};

        let since = days_ago(window_days);

        let visits_by_status = visits::table
            .filter(visits::agency_id.eq(agency))
            .filter(visits::scheduled_at.ge(since))
            .group_by(visits::status)
            .select((visits::status, count_star()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let visits_by_type = visits::table
            .filter(visits::agency_id.eq(agency))
            .filter(visits::scheduled_at.ge(since))
            .group_by(visits::visit_type)
            .select((visits::visit_type, count_star()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let deliveries_by_status = deliveries::table
            .filter(deliveries::agency_id.eq(agency))
            .group_by(deliveries::status)
            .select((deliveries::status, count_star()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let supply_requests_by_status = supply_requests::table
            .filter(supply_requests::agency_id.eq(agency))
            .group_by(supply_requests::status)
            .select((supply_requests::status, count_star()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let direct_messages = messages::table
            .filter(messages::agency_id.eq(agency))
            .filter(messages::created_at.ge(since))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let thread_messages = thread_messages::table
            .inner_join(message_threads::table)
            .filter(message_threads::agency_id.eq(agency))
            .filter(thread_messages::created_at.ge(since))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(AnalyticsMetrics {
            visits_by_status,
            visits_by_type,
            deliveries_by_status,
            supply_requests_by_status,
            direct_messages,
            thread_messages,
        })
    }

    async fn platform_overview(&mut self) -> PgResult<PlatformOverview> {
        use schema::{accounts, agencies, patients};

        let agencies = agencies::table
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let accounts_by_role = accounts::table
            .filter(accounts::deleted_at.is_null())
            .group_by(accounts::role)
            .select((accounts::role, count_star()))
            .load(self)
            .await
            .map_err(PgError::from)?;

        let active_patients = patients::table
            .filter(patients::status.eq(PatientStatus::Active))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(PlatformOverview {
            agencies,
            accounts_by_role,
            active_patients,
        })
    }
}
