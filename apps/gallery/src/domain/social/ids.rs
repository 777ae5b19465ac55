use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Declares an opaque string identifier. The engine never looks inside these;
/// they are whatever primary key the backend hands out.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

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
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Identifies a likeable, commentable record (a prompt in the gallery).
    EntityId
);
opaque_id!(
    /// Primary key of a single comment.
    CommentId
);
opaque_id!(
    /// Identity of the signed-in user, as supplied by the auth layer.
    UserId
);
