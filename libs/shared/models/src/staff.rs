use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of staff roles. The escalation chain and every permission
/// check match on this exhaustively instead of comparing strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Receptionist,
    Doctor,
    HeadDoctor,
    LabTechnician,
    Radiologist,
    Pharmacist,
    Accountant,
    Admin,
}

impl Role {
    pub fn is_clinical(&self) -> bool {
        matches!(self, Role::Doctor | Role::HeadDoctor)
    }

    /// Roles that may acknowledge a vital alert. Doctors own the first
    /// response; head doctors and admins sit above them in the chain.
    pub fn can_acknowledge(&self) -> bool {
        matches!(self, Role::Doctor | Role::HeadDoctor | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Receptionist => write!(f, "receptionist"),
            Role::Doctor => write!(f, "doctor"),
            Role::HeadDoctor => write!(f, "head_doctor"),
            Role::LabTechnician => write!(f, "lab_technician"),
            Role::Radiologist => write!(f, "radiologist"),
            Role::Pharmacist => write!(f, "pharmacist"),
            Role::Accountant => write!(f, "accountant"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub hospital_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}
