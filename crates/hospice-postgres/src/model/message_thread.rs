//! Multi-party message threads.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{message_threads, thread_messages, thread_participants};

/// Conversation between any number of agency members and family.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = message_threads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageThread {
    pub id: Uuid,
    pub agency_id: Uuid,
    /// Patient the conversation is about, if any.
    pub patient_id: Option<Uuid>,
    pub subject: String,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    /// Bumped on every new message.
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = message_threads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMessageThread {
    pub agency_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub subject: String,
    pub created_by: Uuid,
}

/// Membership of an account in a thread, with its read receipt.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = thread_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ThreadParticipant {
    pub thread_id: Uuid,
    pub account_id: Uuid,
    pub joined_at: Timestamp,
    pub last_read_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = thread_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewThreadParticipant {
    pub thread_id: Uuid,
    pub account_id: Uuid,
}

/// Message posted in a thread.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = thread_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ThreadMessage {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = thread_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewThreadMessage {
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
}

/// Thread together with the caller's unread count.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSummary {
    pub thread: MessageThread,
    pub unread: i64,
}
