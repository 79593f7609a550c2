use std::fmt;

use thiserror::Error;

use crate::dialog::DialogError;
use crate::model::ParseEnumError;

/// Machine-readable error codes for scripted callers and log filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    UnknownSeed,
    ClientNotFound,
    ProjectNotFound,
    InvalidStatusTransition,
    InvalidEnumValue,
    ValidationFailed,
    DialogBusy,
    NoActiveForm,
    AuthenticationFailed,
    NotAuthenticated,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::UnknownSeed => "E1002",
            Self::ClientNotFound => "E2001",
            Self::ProjectNotFound => "E2002",
            Self::InvalidStatusTransition => "E2003",
            Self::InvalidEnumValue => "E2004",
            Self::ValidationFailed => "E3001",
            Self::DialogBusy => "E4001",
            Self::NoActiveForm => "E4002",
            Self::AuthenticationFailed => "E5001",
            Self::NotAuthenticated => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownSeed => "Unknown seed source",
            Self::ClientNotFound => "Client not found",
            Self::ProjectNotFound => "Project not found",
            Self::InvalidStatusTransition => "Invalid project status transition",
            Self::InvalidEnumValue => "Invalid kind/status/role value",
            Self::ValidationFailed => "Form validation failed",
            Self::DialogBusy => "Another dialog is already open",
            Self::NoActiveForm => "No dialog for this action is open",
            Self::AuthenticationFailed => "Wrong email or password",
            Self::NotAuthenticated => "No user is signed in",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .foreman/config.toml and retry."),
            Self::UnknownSeed => Some("Use `demo` or `empty` for [seed] source."),
            Self::ClientNotFound | Self::ProjectNotFound => {
                Some("List records first to find a valid id.")
            }
            Self::InvalidStatusTransition => Some(
                "Follow planning -> tender -> approved -> in_progress -> completed -> warranty.",
            ),
            Self::InvalidEnumValue => Some("Use one of the documented tag values."),
            Self::ValidationFailed => Some("Correct the highlighted fields and submit again."),
            Self::DialogBusy => Some("Close the open dialog first."),
            Self::NoActiveForm => Some("Open the create, edit or delete dialog first."),
            Self::AuthenticationFailed => Some("Check the email and password and try again."),
            Self::NotAuthenticated => Some("Sign in before opening this page."),
            Self::InternalUnexpected => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by page controllers and stores.
#[derive(Debug, Error)]
pub enum ForemanError {
    #[error("client '{id}' not found")]
    ClientNotFound { id: String },

    #[error("project '{id}' not found")]
    ProjectNotFound { id: String },

    #[error("cannot move project from {from} to {to}")]
    InvalidStatusTransition {
        from: crate::model::ProjectStatus,
        to: crate::model::ProjectStatus,
    },

    #[error(transparent)]
    InvalidEnum(#[from] ParseEnumError),

    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error("form validation failed on {count} field(s)")]
    Validation { count: usize },

    #[error("wrong email or password")]
    AuthenticationFailed,

    #[error("no user is signed in")]
    NotAuthenticated,

    #[error("unknown seed source '{0}'")]
    UnknownSeed(String),
}

impl ForemanError {
    /// Machine code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ClientNotFound { .. } => ErrorCode::ClientNotFound,
            Self::ProjectNotFound { .. } => ErrorCode::ProjectNotFound,
            Self::InvalidStatusTransition { .. } => ErrorCode::InvalidStatusTransition,
            Self::InvalidEnum(_) => ErrorCode::InvalidEnumValue,
            Self::Dialog(DialogError::AlreadyOpen { .. }) => ErrorCode::DialogBusy,
            Self::Dialog(DialogError::NoActiveForm) => ErrorCode::NoActiveForm,
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::UnknownSeed(_) => ErrorCode::UnknownSeed,
        }
    }

    /// Remediation text, falling back to the code summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
