//! Role Profile Registration
//!
//! Payloads posted to `api/{role}/register`. Field names follow the JSON the
//! backend expects. Every field is optional on input and defaults to empty,
//! the same as an untouched form.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::value_object::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// Patient profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientRegistration {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: String,
    pub allergies: String,
    pub chronic_conditions: String,
    pub contact_number: String,
    pub address: String,
    pub emergency_contact: EmergencyContact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Qualification {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalInfo {
    pub specialization: String,
    pub license_number: String,
    pub experience: String,
    pub qualification: Vec<Qualification>,
    pub current_practice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    pub consultation_fee: String,
    pub currency: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            consultation_fee: String::new(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioItem {
    pub title: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub days: Vec<String>,
    pub time_slots: Vec<TimeSlot>,
}

/// Doctor profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorRegistration {
    pub personal_info: PersonalInfo,
    pub professional_info: ProfessionalInfo,
    pub expertise: Vec<String>,
    pub pricing: Pricing,
    pub bio: String,
    pub portfolio: Vec<PortfolioItem>,
    pub availability: Availability,
}

/// Registration for one role. Serializes as the bare payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Patient(PatientRegistration),
    Doctor(DoctorRegistration),
}

impl Registration {
    pub fn role(&self) -> Role {
        match self {
            Registration::Patient(_) => Role::Patient,
            Registration::Doctor(_) => Role::Doctor,
        }
    }

    /// Read a form payload for `role`. The two shapes overlap on empty input,
    /// so the role picks the type rather than the JSON.
    pub fn from_json(role: Role, value: JsonValue) -> Result<Self, serde_json::Error> {
        Ok(match role {
            Role::Patient => Registration::Patient(serde_json::from_value(value)?),
            Role::Doctor => Registration::Doctor(serde_json::from_value(value)?),
        })
    }
}
