//! Entity identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slug of a catalog entity
///
/// `New` until the server has accepted a creation, `Existing` afterwards.
/// On the wire this is an optional string; an absent, `null` or empty slug
/// reads as `New`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Identifier {
    #[default]
    New,
    Existing(String),
}

impl Identifier {
    pub fn is_new(&self) -> bool {
        matches!(self, Identifier::New)
    }

    pub fn as_slug(&self) -> Option<&str> {
        match self {
            Identifier::New => None,
            Identifier::Existing(slug) => Some(slug),
        }
    }

    /// Assign a slug to a new entity.
    ///
    /// Returns `false` and leaves the identifier alone if one is already set.
    pub fn assign(&mut self, slug: impl Into<String>) -> bool {
        if self.is_new() {
            *self = Identifier::Existing(slug.into());
            true
        } else {
            false
        }
    }
}

impl From<Option<String>> for Identifier {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(slug) if !slug.is_empty() => Identifier::Existing(slug),
            _ => Identifier::New,
        }
    }
}

impl From<Identifier> for Option<String> {
    fn from(value: Identifier) -> Self {
        match value {
            Identifier::New => None,
            Identifier::Existing(slug) => Some(slug),
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::from(Some(value.to_string()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::New => write!(f, "<new>"),
            Identifier::Existing(slug) => write!(f, "{}", slug),
        }
    }
}

/// Last `/`-separated segment of a resource location.
///
/// `"/api/products/acme-widget"` yields `"acme-widget"`. Trailing slashes are
/// ignored, as are query strings and fragments; an empty location yields `None`.
pub fn slug_from_location(location: &str) -> Option<&str> {
    location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
