//! Request types for HTTP handlers.

mod accounts;
mod agencies;
mod authentications;
mod deliveries;
mod invitations;
mod members;
mod messages;
mod notifications;
mod onboarding;
mod paginations;
mod paths;
mod patients;
mod supplies;
mod threads;
mod validations;
mod visits;
mod webhooks;

pub use accounts::*;
pub use agencies::*;
pub use authentications::*;
pub use deliveries::*;
pub use invitations::*;
pub use members::*;
pub use messages::*;
pub use notifications::*;
pub use onboarding::*;
pub use paginations::*;
pub use paths::*;
pub use patients::*;
pub use supplies::*;
pub use threads::*;
pub use validations::*;
pub use visits::*;
pub use webhooks::*;
