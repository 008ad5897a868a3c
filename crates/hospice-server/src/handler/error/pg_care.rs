//! Patient, visit and supply constraint violation handlers.

use hospice_postgres::types::{
    DeliveryConstraints, FamilyMemberConstraints, PatientConstraints, SupplyRequestConstraints,
    VisitConstraints,
};

use crate::handler::{Error, ErrorKind};

impl From<PatientConstraints> for Error<'static> {
    fn from(c: PatientConstraints) -> Self {
        let error = match c {
            PatientConstraints::FirstNameNotEmpty => {
                ErrorKind::BadRequest.with_message("First name cannot be empty")
            }
            PatientConstraints::LastNameNotEmpty => {
                ErrorKind::BadRequest.with_message("Last name cannot be empty")
            }
            PatientConstraints::AgencyMrnUnique => ErrorKind::Conflict
                .with_message("A patient with this medical record number already exists"),
        };

        error.with_resource("patient")
    }
}

impl From<FamilyMemberConstraints> for Error<'static> {
    fn from(c: FamilyMemberConstraints) -> Self {
        let error = match c {
            FamilyMemberConstraints::FullNameNotEmpty => {
                ErrorKind::BadRequest.with_message("Full name cannot be empty")
            }
            FamilyMemberConstraints::PatientAccountUnique => ErrorKind::Conflict
                .with_message("This account already follows the patient"),
        };

        error.with_resource("family_member")
    }
}

impl From<VisitConstraints> for Error<'static> {
    fn from(c: VisitConstraints) -> Self {
        let error = match c {
            VisitConstraints::NotesLengthMax => {
                ErrorKind::BadRequest.with_message("Visit notes cannot exceed 4000 characters")
            }
            VisitConstraints::CompletedHasTimestamp => ErrorKind::BadRequest
                .with_message("A completed visit requires a completion time"),
        };

        error.with_resource("visit")
    }
}

impl From<SupplyRequestConstraints> for Error<'static> {
    fn from(c: SupplyRequestConstraints) -> Self {
        let error = match c {
            SupplyRequestConstraints::QuantityRange => {
                ErrorKind::BadRequest.with_message("Quantity must be between 1 and 100")
            }
            SupplyRequestConstraints::ItemKeyFormat => {
                ErrorKind::BadRequest.with_message("Invalid supply item key")
            }
            SupplyRequestConstraints::NotesLengthMax => ErrorKind::BadRequest
                .with_message("Supply request notes cannot exceed 2000 characters"),
        };

        error.with_resource("supply_request")
    }
}

impl From<DeliveryConstraints> for Error<'static> {
    fn from(c: DeliveryConstraints) -> Self {
        let error = match c {
            DeliveryConstraints::ItemKeyFormat => {
                ErrorKind::BadRequest.with_message("Invalid supply item key")
            }
            DeliveryConstraints::TrackingNumberNotEmpty => {
                ErrorKind::BadRequest.with_message("Tracking number cannot be empty")
            }
            DeliveryConstraints::DeliveredHasTimestamp => ErrorKind::BadRequest
                .with_message("A delivered shipment requires a delivery time"),
        };

        error.with_resource("delivery")
    }
}
