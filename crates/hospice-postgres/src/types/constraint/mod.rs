//! Database constraint violations, one enum per table.
//!
//! Every `CHECK` constraint and unique index declared in the migrations has a
//! variant here, so the server can turn a raw constraint name into a precise
//! client error.

// Identity and tenancy
mod account_sessions;
mod accounts;
mod agencies;
mod agency_users;
mod audit_logs;

// Care
mod deliveries;
mod family_members;
mod invitations;
mod patients;
mod supply_requests;
mod visits;

// Communication
mod message_threads;
mod messages;
mod notifications;
mod thread_messages;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::account_sessions::AccountSessionConstraints;
pub use self::accounts::AccountConstraints;
pub use self::agencies::AgencyConstraints;
pub use self::agency_users::AgencyUserConstraints;
pub use self::audit_logs::AuditLogConstraints;
pub use self::deliveries::DeliveryConstraints;
pub use self::family_members::FamilyMemberConstraints;
pub use self::invitations::InvitationConstraints;
pub use self::message_threads::MessageThreadConstraints;
pub use self::messages::MessageConstraints;
pub use self::notifications::NotificationConstraints;
pub use self::patients::PatientConstraints;
pub use self::supply_requests::SupplyRequestConstraints;
pub use self::thread_messages::ThreadMessageConstraints;
pub use self::visits::VisitConstraints;

/// Any known constraint violation, tagged with its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Account(AccountConstraints),
    AccountSession(AccountSessionConstraints),
    Agency(AgencyConstraints),
    AgencyUser(AgencyUserConstraints),
    AuditLog(AuditLogConstraints),

    Patient(PatientConstraints),
    FamilyMember(FamilyMemberConstraints),
    Invitation(InvitationConstraints),
    Visit(VisitConstraints),
    SupplyRequest(SupplyRequestConstraints),
    Delivery(DeliveryConstraints),

    Message(MessageConstraints),
    MessageThread(MessageThreadConstraints),
    ThreadMessage(ThreadMessageConstraints),
    Notification(NotificationConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Format, length and range checks.
    Validation,
    /// Ordering between timestamps.
    Chronological,
    /// Rules that tie columns together.
    BusinessLogic,
    /// Unique indexes.
    Uniqueness,
}

impl ConstraintViolation {
    /// Parses a constraint name reported by PostgreSQL.
    ///
    /// Returns `None` for names that no migration declares.
    ///
    /// ```
    /// use hospice_postgres::types::{ConstraintViolation, InvitationConstraints};
    ///
    /// assert_eq!(
    ///     ConstraintViolation::new("invitations_token_unique_idx"),
    ///     Some(ConstraintViolation::Invitation(InvitationConstraints::TokenUnique)),
    /// );
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        match prefix {
            "accounts" => try_parse!(AccountConstraints::new => Account),
            "account" => try_parse!(AccountSessionConstraints::new => AccountSession),
            "agencies" => try_parse!(AgencyConstraints::new => Agency),
            "agency" => try_parse!(AgencyUserConstraints::new => AgencyUser),
            "audit" => try_parse!(AuditLogConstraints::new => AuditLog),
            "patients" => try_parse!(PatientConstraints::new => Patient),
            "family" => try_parse!(FamilyMemberConstraints::new => FamilyMember),
            "invitations" => try_parse!(InvitationConstraints::new => Invitation),
            "visits" => try_parse!(VisitConstraints::new => Visit),
            "supply" => try_parse!(SupplyRequestConstraints::new => SupplyRequest),
            "deliveries" => try_parse!(DeliveryConstraints::new => Delivery),
            "messages" => try_parse!(MessageConstraints::new => Message),
            "message" => try_parse!(MessageThreadConstraints::new => MessageThread),
            "thread" => try_parse!(ThreadMessageConstraints::new => ThreadMessage),
            "notifications" => try_parse!(NotificationConstraints::new => Notification),
            _ => None,
        }
    }

    /// Returns the table the constraint is declared on.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Account(_) => "accounts",
            ConstraintViolation::AccountSession(_) => "account_sessions",
            ConstraintViolation::Agency(_) => "agencies",
            ConstraintViolation::AgencyUser(_) => "agency_users",
            ConstraintViolation::AuditLog(_) => "audit_logs",
            ConstraintViolation::Patient(_) => "patients",
            ConstraintViolation::FamilyMember(_) => "family_members",
            ConstraintViolation::Invitation(_) => "invitations",
            ConstraintViolation::Visit(_) => "visits",
            ConstraintViolation::SupplyRequest(_) => "supply_requests",
            ConstraintViolation::Delivery(_) => "deliveries",
            ConstraintViolation::Message(_) => "messages",
            ConstraintViolation::MessageThread(_) => "message_threads",
            ConstraintViolation::ThreadMessage(_) => "thread_messages",
            ConstraintViolation::Notification(_) => "notifications",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
            ConstraintViolation::AccountSession(c) => c.categorize(),
            ConstraintViolation::Agency(c) => c.categorize(),
            ConstraintViolation::AgencyUser(c) => c.categorize(),
            ConstraintViolation::AuditLog(c) => c.categorize(),
            ConstraintViolation::Patient(c) => c.categorize(),
            ConstraintViolation::FamilyMember(c) => c.categorize(),
            ConstraintViolation::Invitation(c) => c.categorize(),
            ConstraintViolation::Visit(c) => c.categorize(),
            ConstraintViolation::SupplyRequest(c) => c.categorize(),
            ConstraintViolation::Delivery(c) => c.categorize(),
            ConstraintViolation::Message(c) => c.categorize(),
            ConstraintViolation::MessageThread(c) => c.categorize(),
            ConstraintViolation::ThreadMessage(c) => c.categorize(),
            ConstraintViolation::Notification(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Account(c) => write!(f, "{c}"),
            ConstraintViolation::AccountSession(c) => write!(f, "{c}"),
            ConstraintViolation::Agency(c) => write!(f, "{c}"),
            ConstraintViolation::AgencyUser(c) => write!(f, "{c}"),
            ConstraintViolation::AuditLog(c) => write!(f, "{c}"),
            ConstraintViolation::Patient(c) => write!(f, "{c}"),
            ConstraintViolation::FamilyMember(c) => write!(f, "{c}"),
            ConstraintViolation::Invitation(c) => write!(f, "{c}"),
            ConstraintViolation::Visit(c) => write!(f, "{c}"),
            ConstraintViolation::SupplyRequest(c) => write!(f, "{c}"),
            ConstraintViolation::Delivery(c) => write!(f, "{c}"),
            ConstraintViolation::Message(c) => write!(f, "{c}"),
            ConstraintViolation::MessageThread(c) => write!(f, "{c}"),
            ConstraintViolation::ThreadMessage(c) => write!(f, "{c}"),
            ConstraintViolation::Notification(c) => write!(f, "{c}"),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("Unknown constraint: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_prefixes_resolve_to_the_right_table() {
        assert_eq!(
            ConstraintViolation::new("accounts_email_unique_idx"),
            Some(ConstraintViolation::Account(AccountConstraints::EmailUnique))
        );
        assert_eq!(
            ConstraintViolation::new("account_sessions_expires_after_created"),
            Some(ConstraintViolation::AccountSession(
                AccountSessionConstraints::ExpiresAfterCreated
            ))
        );
        assert_eq!(
            ConstraintViolation::new("messages_not_self"),
            Some(ConstraintViolation::Message(MessageConstraints::NotSelf))
        );
        assert_eq!(
            ConstraintViolation::new("message_threads_subject_length"),
            Some(ConstraintViolation::MessageThread(
                MessageThreadConstraints::SubjectLength
            ))
        );
        assert_eq!(ConstraintViolation::new("accounts_unknown"), None);
    }

    #[test]
    fn table_name_and_category() {
        let violation = ConstraintViolation::Patient(PatientConstraints::AgencyMrnUnique);
        assert_eq!(violation.table_name(), "patients");
        assert_eq!(violation.constraint_category(), ConstraintCategory::Uniqueness);

        let violation = ConstraintViolation::Invitation(InvitationConstraints::ExpiresAfterCreated);
        assert_eq!(violation.constraint_category(), ConstraintCategory::Chronological);
    }

    #[test]
    fn display_is_the_database_name() {
        let violation =
            ConstraintViolation::SupplyRequest(SupplyRequestConstraints::QuantityRange);
        assert_eq!(violation.to_string(), "supply_requests_quantity_range");
    }
}
