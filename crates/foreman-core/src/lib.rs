//! Domain core for the foreman construction CRM.
//!
//! Records live in per-page in-memory stores seeded at start-up. Pages
//! drive them through dialogs, submit-time validation and toasts; the view
//! layer turns records into labelled, formatted rows.

pub mod access;
pub mod clock;
pub mod config;
pub mod dialog;
pub mod error;
pub mod model;
pub mod notify;
pub mod page;
pub mod seed;
pub mod store;
pub mod validate;
pub mod view;
pub mod workspace;

pub use error::{ErrorCode, ForemanError};
pub use workspace::Workspace;
