pub mod caregiver;
pub mod offer;
pub mod request;

pub use caregiver::CaregiverProfile;
pub use offer::{CaregiverOffer, OfferDraft, OfferStatus};
pub use request::{EmergencyRequest, RequestStatus, Urgency};
