//! Contains constraints, enumerations and other custom types.

pub mod constants;
mod constraint;
mod enums;
mod pagination;

pub use constraint::{
    AccountConstraints, AccountSessionConstraints, AgencyConstraints, AgencyUserConstraints,
    AuditLogConstraints, ConstraintCategory, ConstraintViolation, DeliveryConstraints,
    FamilyMemberConstraints, InvitationConstraints, MessageConstraints, MessageThreadConstraints,
    NotificationConstraints, PatientConstraints, SupplyRequestConstraints,
    ThreadMessageConstraints, VisitConstraints,
};
pub use enums::{
    AccountRole, AgencyRole, Carrier, DeliveryStatus, InvitationKind, JobRole, NotificationEvent,
    OnboardingStep, PatientStatus, SupplyRequestStatus, VisitStatus, VisitType,
};
pub use pagination::{Cursor, CursorPage, CursorPagination, MAX_LIMIT};
