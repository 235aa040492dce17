//! Record storage: the `VisaStore` contract, the search policy, and its
//! PostgreSQL and in-memory implementations.

mod memory;
mod postgres;

pub use memory::MemoryVisaStore;
pub use postgres::PgVisaStore;

use axum::async_trait;
use thiserror::Error;
use uuid::Uuid;
use visa_dates::{day_range_utc, DayRange, NormalizedDate};

use crate::visa::Visa;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Visa already exists for this grant number and document number")]
  Conflict,

  #[error("database: {0}")]
  Database(#[from] sqlx_core::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations used by the HTTP handlers.
///
/// Owner-scoped operations never see another owner's records. `update` and
/// `delete` report whether a matching record existed.
#[async_trait]
pub trait VisaStore: Send + Sync {
  /// All records for `owner`, newest first.
  async fn list(&self, owner: Uuid) -> StoreResult<Vec<Visa>>;
  async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Visa>>;
  async fn insert(&self, visa: &Visa) -> StoreResult<()>;
  async fn update(&self, visa: &Visa) -> StoreResult<bool>;
  async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
  /// At most one record satisfying every condition of `criteria`.
  async fn find_one(&self, criteria: &SearchCriteria) -> StoreResult<Option<Visa>>;
}

/// Conditions of a credential search; all must hold.
///
/// - grant number: case-insensitive, whole-string, after trimming
/// - passport: exact after trimming, against `documentNumber` OR `passportNumber`
/// - date of birth: stored instant inside the UTC day range of the given date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
  pub visa_grant_number: String,
  pub passport_number: String,
  pub date_of_birth: DayRange,
}

impl SearchCriteria {
  pub fn new(visa_grant_number: &str, passport_number: &str, date_of_birth: &NormalizedDate) -> Self {
    Self {
      visa_grant_number: visa_grant_number.trim().to_lowercase(),
      passport_number: passport_number.trim().to_string(),
      date_of_birth: day_range_utc(date_of_birth),
    }
  }

  pub fn matches(&self, visa: &Visa) -> bool {
    let grant_matches = visa.visa_grant_number.to_lowercase() == self.visa_grant_number;
    let passport_matches = visa.document_number == self.passport_number
      || visa.passport_number.as_deref() == Some(self.passport_number.as_str());
    let dob_matches = self
      .date_of_birth
      .contains(&visa.date_of_birth.to_utc_midnight());
    grant_matches && passport_matches && dob_matches
  }
}
