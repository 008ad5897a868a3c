//! Thread repository.

use std::collections::HashMap;
use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::now;
use crate::model::{
    MessageThread, NewMessageThread, NewThreadMessage, NewThreadParticipant, ThreadMessage,
    ThreadParticipant, ThreadSummary,
};
use crate::types::{CursorPage, CursorPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for multi-party threads, their participants and messages.
pub trait MessageThreadRepository {
    fn create_thread(
        &mut self,
        thread: NewMessageThread,
    ) -> impl Future<Output = PgResult<MessageThread>> + Send;

    /// Adds participants, ignoring accounts that already take part.
    fn add_thread_participants(
        &mut self,
        thread_id: Uuid,
        account_ids: Vec<Uuid>,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    fn find_thread_by_id(
        &mut self,
        thread_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<MessageThread>>> + Send;

    fn find_thread_participant(
        &mut self,
        thread_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ThreadParticipant>>> + Send;

    fn list_thread_participant_ids(
        &mut self,
        thread_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Uuid>>> + Send;

    /// Lists threads the account takes part in, most recently active first,
    /// each with the number of messages from others it has not read yet.
    fn list_account_threads(
        &mut self,
        account_id: Uuid,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<ThreadSummary>>> + Send;

    /// Posts a message and bumps the thread's `updated_at`.
    fn create_thread_message(
        &mut self,
        message: NewThreadMessage,
    ) -> impl Future<Output = PgResult<ThreadMessage>> + Send;

    fn list_thread_messages(
        &mut self,
        thread_id: Uuid,
        pagination: CursorPagination,
    ) -> impl Future<Output = PgResult<CursorPage<ThreadMessage>>> + Send;

    /// Moves the participant's read receipt to now.
    fn mark_thread_read(
        &mut self,
        thread_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ThreadParticipant>>> + Send;
}

impl MessageThreadRepository for PgConnection {
    async fn create_thread(&mut self, thread: NewMessageThread) -> PgResult<MessageThread> {
        use schema::message_threads;

        diesel::insert_into(message_threads::table)
            .values(&thread)
            .returning(MessageThread::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn add_thread_participants(
        &mut self,
        thread: Uuid,
        account_ids: Vec<Uuid>,
    ) -> PgResult<usize> {
        use schema::thread_participants::dsl::*;

        let rows: Vec<NewThreadParticipant> = account_ids
            .into_iter()
            .map(|account| NewThreadParticipant {
                thread_id: thread,
                account_id: account,
            })
            .collect();

        diesel::insert_into(thread_participants)
            .values(&rows)
            .on_conflict((thread_id, account_id))
            .do_nothing()
            .execute(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_thread_by_id(&mut self, thread_id: Uuid) -> PgResult<Option<MessageThread>> {
        use schema::message_threads::dsl::*;

        message_threads
            .filter(id.eq(thread_id))
            .select(MessageThread::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_thread_participant(
        &mut self,
        thread: Uuid,
        account: Uuid,
    ) -> PgResult<Option<ThreadParticipant>> {
        use schema::thread_participants::dsl::*;

        thread_participants
            .filter(thread_id.eq(thread))
            .filter(account_id.eq(account))
            .select(ThreadParticipant::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_thread_participant_ids(&mut self, thread: Uuid) -> PgResult<Vec<Uuid>> {
        use schema::thread_participants::dsl::*;

        thread_participants
            .filter(thread_id.eq(thread))
            .select(account_id)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_account_threads(
        &mut self,
        account: Uuid,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<ThreadSummary>> {
        use schema::{message_threads, thread_messages, thread_participants};

        let mut query = message_threads::table
            .inner_join(thread_participants::table)
            .filter(thread_participants::account_id.eq(account))
            .into_boxed();

        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                message_threads::updated_at.lt(cursor_ts).or(message_threads::updated_at
                    .eq(cursor_ts)
                    .and(message_threads::id.lt(cursor.id))),
            );
        }

        let threads: Vec<MessageThread> = query
            .select(MessageThread::as_select())
            .order((message_threads::updated_at.desc(), message_threads::id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        let page = CursorPage::new(threads, pagination.limit, |thread| {
            (thread.updated_at.into(), thread.id)
        });
        let thread_ids: Vec<Uuid> = page.items.iter().map(|thread| thread.id).collect();

        let unread: HashMap<Uuid, i64> = thread_messages::table
            .inner_join(
                thread_participants::table
                    .on(thread_participants::thread_id.eq(thread_messages::thread_id)),
            )
            .filter(thread_messages::thread_id.eq_any(thread_ids))
            .filter(thread_participants::account_id.eq(account))
            .filter(thread_messages::sender_id.ne(account))
            .filter(
                thread_participants::last_read_at
                    .is_null()
                    .or(thread_messages::created_at
                        .nullable()
                        .gt(thread_participants::last_read_at)),
            )
            .group_by(thread_messages::thread_id)
            .select((
                thread_messages::thread_id,
                diesel::dsl::count(thread_messages::id),
            ))
            .load::<(Uuid, i64)>(self)
            .await
            .map_err(PgError::from)?
            .into_iter()
            .collect();

        Ok(page.map(|thread| ThreadSummary {
            unread: unread.get(&thread.id).copied().unwrap_or(0),
            thread,
        }))
    }

    async fn create_thread_message(&mut self, message: NewThreadMessage) -> PgResult<ThreadMessage> {
        use schema::{message_threads, thread_messages};

        let message = diesel::insert_into(thread_messages::table)
            .values(&message)
            .returning(ThreadMessage::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        diesel::update(message_threads::table)
            .filter(message_threads::id.eq(message.thread_id))
            .set(message_threads::updated_at.eq(now()))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(message)
    }

    async fn list_thread_messages(
        &mut self,
        thread: Uuid,
        pagination: CursorPagination,
    ) -> PgResult<CursorPage<ThreadMessage>> {
        use schema::thread_messages::dsl::*;

        let mut query = thread_messages.filter(thread_id.eq(thread)).into_boxed();
        if let Some(cursor) = pagination.after {
            let cursor_ts = jiff_diesel::Timestamp::from(cursor.timestamp);
            query = query.filter(
                created_at
                    .lt(cursor_ts)
                    .or(created_at.eq(cursor_ts).and(id.lt(cursor.id))),
            );
        }

        let items = query
            .select(ThreadMessage::as_select())
            .order((created_at.desc(), id.desc()))
            .limit(pagination.fetch_limit())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(CursorPage::new(items, pagination.limit, |message| {
            (message.created_at.into(), message.id)
        }))
    }

    async fn mark_thread_read(
        &mut self,
        thread: Uuid,
        account: Uuid,
    ) -> PgResult<Option<ThreadParticipant>> {
        use schema::thread_participants::dsl::*;

        diesel::update(thread_participants)
            .filter(thread_id.eq(thread))
            .filter(account_id.eq(account))
            .set(last_read_at.eq(Some(now())))
            .returning(ThreadParticipant::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
