//! Per-page modal state.
//!
//! At most one dialog is open per page. Opening requires the closed state;
//! closing works from anywhere and drops whatever the dialog held.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("a {open} dialog is already open")]
    AlreadyOpen { open: &'static str },

    #[error("no dialog for this action is open")]
    NoActiveForm,
}

/// Which modal a page is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog<R> {
    Closed,
    Create,
    Edit(R),
    View(R),
    ConfirmDelete(String),
}

impl<R> Default for Dialog<R> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<R> Dialog<R> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Create => "create",
            Self::Edit(_) => "edit",
            Self::View(_) => "view",
            Self::ConfirmDelete(_) => "confirm-delete",
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    fn open(&mut self, next: Self) -> Result<(), DialogError> {
        if self.is_open() {
            return Err(DialogError::AlreadyOpen { open: self.name() });
        }
        *self = next;
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<(), DialogError> {
        self.open(Self::Create)
    }

    pub fn open_edit(&mut self, record: R) -> Result<(), DialogError> {
        self.open(Self::Edit(record))
    }

    pub fn open_view(&mut self, record: R) -> Result<(), DialogError> {
        self.open(Self::View(record))
    }

    pub fn open_confirm_delete(&mut self, id: impl Into<String>) -> Result<(), DialogError> {
        self.open(Self::ConfirmDelete(id.into()))
    }

    /// Return to `Closed`, handing back the state that was open.
    pub fn close(&mut self) -> Self {
        std::mem::take(self)
    }

    /// The record being edited, if an edit dialog is open.
    #[must_use]
    pub const fn editing(&self) -> Option<&R> {
        match self {
            Self::Edit(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_dialog_at_a_time() {
        let mut dialog: Dialog<u32> = Dialog::Closed;
        dialog.open_edit(7).unwrap();
        assert_eq!(
            dialog.open_create(),
            Err(DialogError::AlreadyOpen { open: "edit" })
        );
        assert_eq!(dialog.editing(), Some(&7));
    }

    #[test]
    fn close_from_any_state() {
        let opened: [Dialog<u32>; 4] = [
            Dialog::Create,
            Dialog::Edit(1),
            Dialog::View(2),
            Dialog::ConfirmDelete("c-1".into()),
        ];
        for state in opened {
            let mut dialog = state.clone();
            assert_eq!(dialog.close(), state);
            assert_eq!(dialog, Dialog::Closed);
            assert!(dialog.open_create().is_ok());
        }
    }

    #[test]
    fn closing_closed_is_harmless() {
        let mut dialog: Dialog<u32> = Dialog::default();
        assert_eq!(dialog.close(), Dialog::Closed);
        assert!(!dialog.is_open());
    }
}
