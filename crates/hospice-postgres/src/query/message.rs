use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::now;
use crate::model::{Message, NewMessage};
use crate::types::{CursorPage, CursorPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for patient-scoped direct messages.
pub trait MessageRepository {
    fn create_message(
        &mut self,
        message: NewMessage,
    ) -> impl Future<Output = PgResult<Message>> + Send;

    fn find_message_by_id(
        &mut self,
        message_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Message>>> + Send;

    /// Lists messages about a patient, newest first.
    ///
    /// When `participant` is given, only messages sent or received by that
    /// account are returned.
    fn list_patient_messages(
        &mut self,
        patient_id: Uuid,
        participant: Option<Uuid>,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<Message>>> + Send;

    /// Marks a message read on behalf of its recipient.
    ///
    /// Returns `None` when the message does not exist or is addressed to
    /// someone else. Marking an already read message keeps its `read_at`.
    fn mark_message_read(
        &mut self,
        message_id: Uuid,
        recipient_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Message>>> + Send;
}

impl MessageRepository for PgConnection {
    async fn create_message(&mut self, message: NewMessage) -> PgResult<Message> {
        use schema::messages;

        diesel::insert_into(messages::table)
            .values(&message)
            .returning(Message::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_message_by_id(&mut self, message_id: Uuid) -> PgResult<Option<Message>> {
        use schema::messages::dsl::*;

        messages
            .filter(id.eq(message_id))
            .select(Message::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_patient_messages(
        &mut self,
        patient: Uuid,
        participant: Option<Uuid>,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<Message>> {
        use schema::messages::dsl::*;

        let mut query = messages.filter(patient_id.eq(patient)).into_boxed();
        if let Some(participant) = participant {
            query = query.filter(sender_id.eq(participant).or(recipient_id.eq(participant)));
        }

        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(Message::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |message| {
            (message.created_at.into(), message.id)
        }))
    }

    async fn mark_message_read(
        &mut self,
        message_id: Uuid,
        recipient: Uuid,
    ) -> PgResult<Option<Message>> {
        use schema::messages::dsl::*;

        let updated = diesel::update(messages)
            .filter(id.eq(message_id))
            .filter(recipient_id.eq(recipient))
            .filter(is_read.eq(false))
            .set((is_read.eq(true), read_at.eq(Some(now()))))
            .returning(Message::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        if updated.is_some() {
            return Ok(updated);
        }

        messages
            .filter(id.eq(message_id))
            .filter(recipient_id.eq(recipient))
            .select(Message::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
