pub mod access;
pub mod auth;
pub mod clients;
pub mod completions;
pub mod dashboard;
pub mod projects;

use foreman_core::ForemanError;
use foreman_core::page::SubmitError;

use crate::output::{CliError, OutputMode, fail, render_error};

/// Render a rejected submit, field errors included, and hand it back for
/// propagation.
pub fn submit_failed(mode: OutputMode, err: SubmitError) -> anyhow::Error {
    match err {
        SubmitError::Invalid(errors) => {
            let core = ForemanError::Validation {
                count: errors.len(),
            };
            let cli = CliError::from(&core).with_fields(&errors);
            if let Err(render_err) = render_error(mode, &cli) {
                tracing::warn!(error = %render_err, "could not render error");
            }
            core.into()
        }
        SubmitError::Failed(inner) => fail(mode, inner),
    }
}

/// Treat blank flag values as absent.
pub fn flag(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}
