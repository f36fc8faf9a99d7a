//! Strongly-typed ID wrappers for all entity types
//!
//! Identities are the numeric primary keys assigned when a row was first
//! created. Restore carries them over unchanged, so they are plain integers
//! rather than generated values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identity
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw identity
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(UserId, "user-");
define_id!(CategoryId, "cat-");
define_id!(TagId, "tag-");
define_id!(PostId, "post-");
define_id!(PostVersionId, "ver-");
define_id!(CommentId, "cmt-");
define_id!(SettingsId, "set-");
define_id!(AdId, "ad-");
define_id!(RedirectId, "rdr-");
define_id!(BackupId, "bkp-");
