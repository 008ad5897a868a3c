//! Message, thread and notification constraint violation handlers.

use hospice_postgres::types::{
    MessageConstraints, MessageThreadConstraints, NotificationConstraints,
    ThreadMessageConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<MessageConstraints> for Error<'static> {
    fn from(c: MessageConstraints) -> Self {
        let error = match c {
            MessageConstraints::BodyLength => ErrorKind::BadRequest
                .with_message("Message must be between 1 and 4000 characters"),
            MessageConstraints::NotSelf => {
                ErrorKind::BadRequest.with_message("You cannot send a message to yourself")
            }
            MessageConstraints::ReadHasTimestamp => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("message")
    }
}

impl From<MessageThreadConstraints> for Error<'static> {
    fn from(c: MessageThreadConstraints) -> Self {
        let error = match c {
            MessageThreadConstraints::SubjectLength => ErrorKind::BadRequest
                .with_message("Thread subject must be between 1 and 200 characters"),
        };

        error.with_resource("thread")
    }
}

impl From<ThreadMessageConstraints> for Error<'static> {
    fn from(c: ThreadMessageConstraints) -> Self {
        let error = match c {
            ThreadMessageConstraints::BodyLength => ErrorKind::BadRequest
                .with_message("Message must be between 1 and 4000 characters"),
        };

        error.with_resource("thread_message")
    }
}

impl From<NotificationConstraints> for Error<'static> {
    fn from(c: NotificationConstraints) -> Self {
        let error = match c {
            NotificationConstraints::TitleLength => ErrorKind::BadRequest
                .with_message("Notification title must be between 1 and 200 characters"),
            NotificationConstraints::PayloadObject => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("notification")
    }
}
