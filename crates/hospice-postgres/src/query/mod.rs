//! Repository traits implemented for [`PgConnection`](crate::PgConnection).
//!
//! Every trait method borrows the connection mutably and returns a `Send`
//! future, so repositories compose inside [`PgConn::transaction`].
//! List methods take a [`CursorPagination`] and return newest rows first.
//!
//! [`PgConn::transaction`]: crate::PgConn::transaction
//! [`CursorPagination`]: crate::types::CursorPagination

mod account;
mod account_session;
mod agency;
mod agency_user;
mod audit_log;
mod dashboard;
mod delivery;
mod family_member;
mod invitation;
mod message;
mod message_thread;
mod notification;
mod patient;
mod supply_request;
mod visit;

pub use account::AccountRepository;
pub use account_session::AccountSessionRepository;
pub use agency::AgencyRepository;
pub use agency_user::AgencyUserRepository;
pub use audit_log::AuditLogRepository;
pub use dashboard::{AnalyticsMetrics, ComplianceMetrics, DashboardRepository, PlatformOverview};
pub use delivery::{DeliveryFilter, DeliveryRepository};
pub use family_member::FamilyMemberRepository;
pub use invitation::InvitationRepository;
pub use message::MessageRepository;
pub use message_thread::MessageThreadRepository;
pub use notification::NotificationRepository;
pub use patient::PatientRepository;
pub use supply_request::{SupplyRequestFilter, SupplyRequestRepository};
pub use visit::{VisitFilter, VisitRepository};

/// Returns the current instant in the column representation.
#[inline]
pub(crate) fn now() -> jiff_diesel::Timestamp {
    jiff_diesel::Timestamp::from(jiff::Timestamp::now())
}
