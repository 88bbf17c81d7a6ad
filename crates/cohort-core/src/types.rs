//! Identifiers and membership roles shared across the workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declare a `u64` identifier newtype.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// A registered person (applicant or volunteer).
    UserId
);
id_type!(
    /// A mentoring team within a session.
    TeamId
);
id_type!(
    /// A project a team works on.
    ProjectId
);
id_type!(
    /// A program session (one cohort).
    SessionId
);
id_type!(
    /// An application survey attached to a session.
    SurveyId
);
id_type!(
    /// One applicant's survey response.
    ResponseId
);

/// Role a user holds within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Leads group meetings; overlaps with the whole team.
    Navigator,
    /// Holds 1:1 meetings with each djangonaut.
    Captain,
    /// Mentee placed onto a team.
    Djangonaut,
    Organizer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Navigator, Role::Captain, Role::Djangonaut, Role::Organizer];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Navigator => "navigator",
            Role::Captain => "captain",
            Role::Djangonaut => "djangonaut",
            Role::Organizer => "organizer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
        let team: TeamId = serde_json::from_str("7").unwrap();
        assert_eq!(team, TeamId(7));
    }

    #[test]
    fn role_round_trips_through_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Djangonaut).unwrap(), "\"djangonaut\"");
        let role: Role = serde_json::from_str("\"captain\"").unwrap();
        assert_eq!(role, Role::Captain);
        assert_eq!(Role::Navigator.to_string(), "navigator");
    }
}
