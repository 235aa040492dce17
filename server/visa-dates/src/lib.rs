//! Visa Records date core: flexible parsing and day-level matching.
//!
//! Record handlers normalize caller-supplied dates with [`parse`] before
//! storing them; the search handler turns the normalized date of birth into
//! a [`DayRange`] with [`day_range_utc`] and filters on it.
//!
//! No DB, no network, no logging; pure computation.

pub mod error;
pub mod matcher;
pub mod parse;
pub mod types;

pub use error::UnparseableDate;
pub use matcher::{day_range_utc, same_calendar_day};
pub use parse::{parse, DateParser, FUTURE_YEAR_TOLERANCE, TWO_DIGIT_YEAR_PIVOT};
pub use types::{DayRange, NormalizedDate, RawDateInput};
