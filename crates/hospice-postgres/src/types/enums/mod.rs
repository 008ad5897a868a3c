//! PostgreSQL enumerations.

mod account_role;
mod agency_role;
mod carrier;
mod delivery_status;
mod invitation_kind;
mod job_role;
mod notification_event;
mod onboarding_step;
mod patient_status;
mod supply_request_status;
mod visit_status;
mod visit_type;

pub use self::account_role::AccountRole;
pub use self::agency_role::AgencyRole;
pub use self::carrier::Carrier;
pub use self::delivery_status::DeliveryStatus;
pub use self::invitation_kind::InvitationKind;
pub use self::job_role::JobRole;
pub use self::notification_event::NotificationEvent;
pub use self::onboarding_step::OnboardingStep;
pub use self::patient_status::PatientStatus;
pub use self::supply_request_status::SupplyRequestStatus;
pub use self::visit_status::VisitStatus;
pub use self::visit_type::VisitType;
