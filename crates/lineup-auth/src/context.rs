use serde::{Deserialize, Serialize};

/// The role resolved from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Patient,
    Practitioner,
    Staff,
    Admin,
}

impl Role {
    /// Staff and Admin can see and operate every queue.
    #[must_use]
    pub fn is_operational(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Self::Patient),
            "Practitioner" => Ok(Self::Practitioner),
            "Staff" => Ok(Self::Staff),
            "Admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patient => write!(f, "Patient"),
            Self::Practitioner => write!(f, "Practitioner"),
            Self::Staff => write!(f, "Staff"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// The verified caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Role granted to the caller.
    pub role: Role,
    /// Reference identifying the caller, e.g. `Patient/123`.
    pub identity_id: String,
}

impl AuthContext {
    pub fn new(role: Role, identity_id: impl Into<String>) -> Self {
        Self {
            role,
            identity_id: identity_id.into(),
        }
    }

    /// Whether this caller *is* the given patient.
    #[must_use]
    pub fn is_self(&self, patient_ref: &str) -> bool {
        self.role == Role::Patient && self.identity_id == patient_ref
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in [Role::Patient, Role::Practitioner, Role::Staff, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("Visitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_is_self_requires_patient_role() {
        let patient = AuthContext::new(Role::Patient, "Patient/1");
        assert!(patient.is_self("Patient/1"));
        assert!(!patient.is_self("Patient/2"));

        // Staff sharing an id with a patient record is not "self"
        let staff = AuthContext::new(Role::Staff, "Patient/1");
        assert!(!staff.is_self("Patient/1"));
    }
}
