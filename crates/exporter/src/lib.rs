//! # Ledgerlens Exporter
//!
//! Renders a user's expenses and income as a two-sheet workbook ("Expenses" and
//! "Income"). Each sheet serializes to CSV; the web server streams a single sheet
//! and the CLI writes both to a directory.

pub mod error;
pub mod workbook;

pub use error::ExportError;
pub use workbook::{Sheet, Workbook};
