//! Pure derivations from record lists: filters, display rows, formatting.

pub mod filter;
pub mod format;
pub mod rows;

pub use filter::{ClientFilter, ProjectFilter, parse_status_query};
pub use format::{
    Locale, format_currency, format_date, format_datetime, format_number, format_percent,
    format_relative_date,
};
pub use rows::{ClientRow, ProjectRow, client_rows, project_rows};
