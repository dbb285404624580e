//! Caller identity, supplied by the external identity provider.
//!
//! The store never reads ambient session state; every operation takes
//! the caller as an explicit parameter.

use serde::{Deserialize, Serialize};

/// Named role group attached to an identity by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    Doctors,
    Patients,
}

impl Group {
    /// Parse from the provider's group-name string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Doctors" => Some(Self::Doctors),
            "Patients" => Some(Self::Patients),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctors => "Doctors",
            Self::Patients => "Patients",
        }
    }
}

/// An authenticated caller: opaque subject id plus group memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub groups: Vec<Group>,
}

impl Identity {
    pub fn new(id: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            id: id.into(),
            groups,
        }
    }

    /// An identity in the Patients group.
    pub fn patient(id: impl Into<String>) -> Self {
        Self::new(id, vec![Group::Patients])
    }

    /// An identity in the Doctors group.
    pub fn doctor(id: impl Into<String>) -> Self {
        Self::new(id, vec![Group::Doctors])
    }

    pub fn in_group(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }

    pub fn is_doctor(&self) -> bool {
        self.in_group(Group::Doctors)
    }

    pub fn is_patient(&self) -> bool {
        self.in_group(Group::Patients)
    }
}
