use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid month '{0}': expected a full month name (e.g. \"January\") or a number from 1 to 12")]
    InvalidMonth(String),

    #[error("Invalid report selector: {0}")]
    Selector(#[from] CoreError),
}
