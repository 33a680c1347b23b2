pub mod attendance;
pub mod audit;
pub mod employee;

#[cfg(test)]
mod store_tests;

use chrono::{DateTime, NaiveDate, Utc};

/// Typed bind values for dynamically built WHERE/SET clauses.
#[derive(Debug)]
pub(crate) enum BindValue {
    Text(String),
    Real(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}
