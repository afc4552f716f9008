//! Person domain entity
//!
//! A member of the field sales organisation. Only people holding the
//! team-leader role are evaluated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub Uuid);

impl PersonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PersonId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organisational role of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Teamleader,
    Salesman,
    Viewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Superadmin => write!(f, "superadmin"),
            Role::Admin => write!(f, "admin"),
            Role::Teamleader => write!(f, "teamleader"),
            Role::Salesman => write!(f, "salesman"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "teamleader" => Ok(Role::Teamleader),
            "salesman" => Ok(Role::Salesman),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A person known to the directory
#[derive(Debug, Clone, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub honda_id: String,
    pub name: String,
    pub job_title: Option<String>,
    pub role: Role,
    pub dealer_code: Option<String>,
    pub active: bool,
}

impl Person {
    pub fn is_team_leader(&self) -> bool {
        self.role == Role::Teamleader
    }
}
