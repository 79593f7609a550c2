//! Domain records: clients, projects and users.
//!
//! Every enumeration carries three spellings:
//! - a stable machine tag (`as_str`, serde, `FromStr`),
//! - a locale label for display (`label`), and
//! - for statuses, lifecycle rules.
//!
//! Labels are exhaustive `match` arms, so adding a variant does not compile
//! until its label exists.

pub mod client;
pub mod project;
pub mod user;

use std::fmt;

pub use client::{Client, ClientFields, ClientKind};
pub use project::{
    InvalidTransition, Priority, Project, ProjectAttachments, ProjectFields, ProjectKind,
    ProjectStatus,
};
pub use user::{Credential, ProfileFields, User, UserRole};

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace('-', "_")
}

/// Treat blank optional text as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
