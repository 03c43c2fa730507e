//! Visitor records and their validated name.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Maximum length of a visitor name, in characters.
///
/// Matches the `VARCHAR(255)` column that stores it.
pub const MAX_NAME_LEN: usize = 255;

/// A visitor's display name.
///
/// Guaranteed non-empty and at most [`MAX_NAME_LEN`] characters. Whitespace
/// is kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VisitorName(String);

impl VisitorName {
    /// Validates a raw name.
    ///
    /// # Examples
    ///
    /// ```
    /// use visitor_log_core::VisitorName;
    ///
    /// let name = VisitorName::parse("Alice").unwrap();
    /// assert_eq!(name.as_str(), "Alice");
    /// assert!(VisitorName::parse("").is_err());
    /// ```
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(Error::validation_field("name", "Name is required"));
        }
        let len = raw.chars().count();
        if len > MAX_NAME_LEN {
            return Err(Error::validation_field(
                "name",
                format!("Name must be at most {MAX_NAME_LEN} characters (got {len})"),
            ));
        }
        Ok(Self(raw))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VisitorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VisitorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VisitorName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for VisitorName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<VisitorName> for String {
    fn from(name: VisitorName) -> Self {
        name.0
    }
}

/// A persisted visitor record.
///
/// `id` and `created_at` are assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    /// Storage-assigned identifier, unique and immutable.
    pub id: i32,
    /// Display name as submitted.
    pub name: String,
    /// Insertion time, as recorded by the storage clock.
    pub created_at: NaiveDateTime,
}

/// The public shape of a visitor in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorSummary {
    /// Display name.
    pub name: String,
}

impl From<Visitor> for VisitorSummary {
    fn from(visitor: Visitor) -> Self {
        Self { name: visitor.name }
    }
}

impl From<&Visitor> for VisitorSummary {
    fn from(visitor: &Visitor) -> Self {
        Self {
            name: visitor.name.clone(),
        }
    }
}
