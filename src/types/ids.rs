//! Newtype identifiers for the board domain
//!
//! Ids are opaque strings assigned by the remote authority. The client never
//! mints them; it only carries them around and compares them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// The id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Identifies a task
    TaskId
);
define_id!(
    /// Identifies a board column
    ColumnId
);
define_id!(
    /// Identifies a board
    BoardId
);
define_id!(
    /// Identifies an epic
    EpicId
);
define_id!(
    /// Identifies a person a task can be assigned to
    ActorId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = TaskId::from_string("T-42");
        assert_eq!(id.as_str(), "T-42");
        assert_eq!(id.to_string(), "T-42");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"T-42\"");
        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_ordering() {
        let a = ColumnId::from("col-a");
        let b = ColumnId::from("col-b");
        assert!(a < b);
    }
}
