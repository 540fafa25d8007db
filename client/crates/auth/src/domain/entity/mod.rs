//! Entity Module

pub mod claims;
pub mod registration;
pub mod session_record;
pub mod stored_session;

pub use claims::Claims;
pub use registration::{DoctorRegistration, PatientRegistration, Registration};
pub use session_record::SessionRecord;
pub use stored_session::{RoleGrant, StoredSession};
