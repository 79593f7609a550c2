//! Page controllers.
//!
//! Each page owns its record store and dialog. Actions validate, mutate,
//! close the dialog and push a toast; the front end only renders.

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod profile;
pub mod projects;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::dialog::{Dialog, DialogError};
use crate::error::ForemanError;
use crate::notify::Toasts;
use crate::store::{Record, RecordStore};
use crate::validate::FormErrors;

pub use auth::{AuthPage, Session};
pub use clients::{ClientStats, ClientsPage};
pub use dashboard::{DashboardStats, StatusCount};
pub use profile::{ProfilePage, ProfileView};
pub use projects::{ProjectListing, ProjectsPage};

/// Why a submitted form did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Field errors to show inline; the dialog stays open.
    #[error("form validation failed on {} field(s)", .0.len())]
    Invalid(FormErrors),

    #[error(transparent)]
    Failed(#[from] ForemanError),
}

impl SubmitError {
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Failed(_) => None,
        }
    }
}

impl From<SubmitError> for ForemanError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(errors) => Self::Validation {
                count: errors.len(),
            },
            SubmitError::Failed(inner) => inner,
        }
    }
}

impl From<DialogError> for SubmitError {
    fn from(err: DialogError) -> Self {
        Self::Failed(err.into())
    }
}

/// Toast texts for one record kind.
#[derive(Debug, Clone, Copy)]
pub struct CrudMessages {
    pub created: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

/// A record kind managed through a page dialog.
pub trait PageRecord: Record {
    /// Raw form input.
    type Form;

    const MESSAGES: CrudMessages;

    fn validate(form: &Self::Form) -> Result<Self::Fields, FormErrors>;
    fn not_found(id: &str) -> ForemanError;
}

/// Store plus dialog: the create/edit/view/delete flow shared by record pages.
pub struct CrudPage<R: PageRecord> {
    store: RecordStore<R>,
    dialog: Dialog<R>,
}

impl<R: PageRecord> CrudPage<R> {
    pub fn new(seed: Vec<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RecordStore::new(seed, clock),
            dialog: Dialog::Closed,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut RecordStore<R> {
        &mut self.store
    }

    #[must_use]
    pub const fn dialog(&self) -> &Dialog<R> {
        &self.dialog
    }

    fn find(&self, id: &str) -> Result<R, ForemanError> {
        self.store.get(id).cloned().ok_or_else(|| R::not_found(id))
    }

    pub fn open_create(&mut self) -> Result<(), ForemanError> {
        Ok(self.dialog.open_create()?)
    }

    /// Open the edit dialog holding a snapshot of the record.
    pub fn open_edit(&mut self, id: &str) -> Result<R, ForemanError> {
        let record = self.find(id)?;
        self.dialog.open_edit(record.clone())?;
        Ok(record)
    }

    pub fn open_view(&mut self, id: &str) -> Result<R, ForemanError> {
        let record = self.find(id)?;
        self.dialog.open_view(record.clone())?;
        Ok(record)
    }

    pub fn open_delete(&mut self, id: &str) -> Result<(), ForemanError> {
        self.find(id)?;
        Ok(self.dialog.open_confirm_delete(id)?)
    }

    /// Close whatever is open, discarding any draft.
    pub fn close(&mut self) {
        self.dialog.close();
    }

    /// Submit the create or edit dialog.
    ///
    /// Invalid input leaves the dialog open. An edit whose record has since
    /// disappeared closes the dialog with the generic error toast.
    pub fn submit(&mut self, form: &R::Form, toasts: &mut Toasts) -> Result<R, SubmitError> {
        let editing = match &self.dialog {
            Dialog::Create => None,
            Dialog::Edit(record) => Some(record.id().to_string()),
            _ => return Err(DialogError::NoActiveForm.into()),
        };

        let fields = R::validate(form).map_err(|errors| {
            warn!(fields = errors.len(), "form rejected");
            SubmitError::Invalid(errors)
        })?;
        self.dialog.close();

        if let Some(id) = editing {
            if let Some(updated) = self.store.update(&id, fields) {
                info!(id = updated.id(), "record updated");
                toasts.success(R::MESSAGES.updated);
                Ok(updated)
            } else {
                warn!(id, "edited record no longer exists");
                toasts.error(R::MESSAGES.update_failed);
                Err(R::not_found(&id).into())
            }
        } else {
            let created = self.store.create(fields);
            info!(id = created.id(), "record created");
            toasts.success(R::MESSAGES.created);
            Ok(created)
        }
    }

    /// Carry out the pending delete confirmation.
    pub fn confirm_delete(&mut self, toasts: &mut Toasts) -> Result<R, ForemanError> {
        let Dialog::ConfirmDelete(id) = &self.dialog else {
            return Err(DialogError::NoActiveForm.into());
        };
        let id = id.clone();
        self.dialog.close();
        if let Some(removed) = self.store.delete(&id) {
            info!(id, "record deleted");
            toasts.success(R::MESSAGES.deleted);
            Ok(removed)
        } else {
            warn!(id, "deleted record no longer exists");
            toasts.error(R::MESSAGES.delete_failed);
            Err(R::not_found(&id))
        }
    }
}
