//! Type-safe identifiers for players and items.
//!
//! Players are identified by a [`Uuid`] newtype so they cannot be confused
//! with any other UUID in a host. Items are identified by a namespaced
//! string (`minecraft:stone`), which is the stable form written to snapshots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace assumed when an item identifier has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player known to the host.
    PlayerId
}

/// Errors produced when parsing an [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemIdError {
    /// The identifier was empty.
    #[error("item identifier is empty")]
    Empty,

    /// The namespace part contains characters outside `[a-z0-9_.-]`.
    #[error("invalid namespace in item identifier: {raw}")]
    InvalidNamespace {
        /// The identifier as supplied.
        raw: String,
    },

    /// The path part contains characters outside `[a-z0-9_./-]`.
    #[error("invalid path in item identifier: {raw}")]
    InvalidPath {
        /// The identifier as supplied.
        raw: String,
    },
}

/// A namespaced item identifier such as `minecraft:diamond`.
///
/// Always stored in canonical `namespace:path` form. Ordering is
/// lexicographic on that form, which is the order discoveries within a
/// single player's tick are processed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Parse an identifier, defaulting the namespace to [`DEFAULT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`ItemIdError`] if either part is empty or contains
    /// characters outside the allowed set.
    pub fn parse(raw: &str) -> Result<Self, ItemIdError> {
        if raw.is_empty() {
            return Err(ItemIdError::Empty);
        }

        let (namespace, path) = raw.split_once(':').unwrap_or((DEFAULT_NAMESPACE, raw));

        if namespace.is_empty() || !namespace.chars().all(is_namespace_char) {
            return Err(ItemIdError::InvalidNamespace {
                raw: raw.to_owned(),
            });
        }
        if path.is_empty() || !path.chars().all(is_path_char) {
            return Err(ItemIdError::InvalidPath {
                raw: raw.to_owned(),
            });
        }

        Ok(Self(format!("{namespace}:{path}")))
    }

    /// Return the canonical `namespace:path` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the namespace part.
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or(DEFAULT_NAMESPACE, |(ns, _)| ns)
    }

    /// Return the path part.
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, path)| path)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

const fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

const fn is_path_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-' | '/')
}
