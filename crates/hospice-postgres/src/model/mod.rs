//! Diesel models for every table.
//!
//! Each table has a queryable row struct, a `New*` insertable and, where rows
//! change after creation, an `Update*` changeset.

mod account;
mod account_session;
mod agency;
mod agency_user;
mod audit_log;
mod delivery;
mod family_member;
mod invitation;
mod message;
mod message_thread;
mod notification;
mod patient;
mod supply_request;
mod visit;

pub use account::{Account, NewAccount, UpdateAccount};
pub use account_session::{AccountSession, NewAccountSession};
pub use agency::{Agency, NewAgency, UpdateAgency};
pub use agency_user::{AgencyUser, NewAgencyUser, UpdateAgencyUser};
pub use audit_log::{AuditLog, NewAuditLog};
pub use delivery::{Delivery, NewDelivery, UpdateDelivery};
pub use family_member::{FamilyMember, NewFamilyMember};
pub use invitation::{Invitation, InvitationState, NewInvitation};
pub use message::{Message, NewMessage};
pub use message_thread::{
    MessageThread, NewMessageThread, NewThreadMessage, NewThreadParticipant, ThreadMessage,
    ThreadParticipant, ThreadSummary,
};
pub use notification::{NewNotification, Notification};
pub use patient::{NewPatient, Patient, UpdatePatient};
pub use supply_request::{NewSupplyRequest, SupplyRequest};
pub use visit::{NewVisit, UpdateVisit, Visit};
