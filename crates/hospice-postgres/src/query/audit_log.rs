use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{AuditLog, NewAuditLog};
use crate::types::{CursorPage, CursorPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for the append-only audit log.
pub trait AuditLogRepository {
    fn create_audit_log(
        &mut self,
        entry: NewAuditLog,
    ) -> impl Future<Output = PgResult<AuditLog>> + Send;

    fn list_agency_audit_logs(
        &mut self,
        agency_id: Uuid,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<AuditLog>>> + Send;
}

impl AuditLogRepository for PgConnection {
    async fn create_audit_log(&mut self, entry: NewAuditLog) -> PgResult<AuditLog> {
        use schema::audit_logs;

        diesel::insert_into(audit_logs::table)
            .values(&entry)
            .returning(AuditLog::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_agency_audit_logs(
        &mut self,
        agency: Uuid,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<AuditLog>> {
        use schema::audit_logs::dsl::*;

        let mut query = audit_logs.filter(agency_id.eq(agency)).into_boxed();
        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(AuditLog::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |entry| {
            (entry.created_at.into(), entry.id)
        }))
    }
}
