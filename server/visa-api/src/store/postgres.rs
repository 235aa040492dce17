//! PostgreSQL store via sqlx-core + sqlx-postgres.
//!
//! Date fields are TIMESTAMPTZ holding the UTC midnight of the calendar date.
//! Search bounds `date_of_birth` with the UTC day range, so rows written
//! with another offset's midnight still match on their UTC calendar day.

use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx_core::error::Error as SqlxError;
use sqlx_core::query::{query, Query};
use sqlx_core::row::Row;
use sqlx_postgres::{PgArguments, PgPool, PgPoolOptions, PgRow, Postgres};
use tracing::info;
use uuid::Uuid;
use visa_dates::NormalizedDate;

use super::{SearchCriteria, StoreError, StoreResult, VisaStore};
use crate::visa::Visa;

const MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &[&str] = &[
  r#"
  CREATE TABLE IF NOT EXISTS visas (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    family_name TEXT NOT NULL,
    given_name TEXT NOT NULL,
    visa_description TEXT NOT NULL,
    date_of_birth TIMESTAMPTZ NOT NULL,
    document_number TEXT NOT NULL,
    passport_number TEXT,
    visa_grant_number TEXT NOT NULL,
    visa_class TEXT NOT NULL,
    visa_applicant TEXT NOT NULL DEFAULT 'Primary',
    visa_grant_date TIMESTAMPTZ NOT NULL,
    visa_expiry_date TIMESTAMPTZ NOT NULL,
    must_not_arrive_after TIMESTAMPTZ,
    enter_before_date TIMESTAMPTZ,
    location TEXT,
    visa_status TEXT NOT NULL DEFAULT 'In Effect',
    period_of_stay TEXT,
    visa_type TEXT NOT NULL DEFAULT 'Visitor',
    passport_country TEXT,
    application_id TEXT,
    transaction_ref TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
  )
  "#,
  "CREATE UNIQUE INDEX IF NOT EXISTS visas_grant_document_key ON visas (visa_grant_number, document_number)",
  "CREATE INDEX IF NOT EXISTS visas_user_created_idx ON visas (user_id, created_at DESC)",
  "CREATE INDEX IF NOT EXISTS visas_grant_lower_idx ON visas (lower(visa_grant_number))",
];

const INSERT_VISA: &str = r#"
  INSERT INTO visas (
    id, user_id,
    family_name, given_name, visa_description, date_of_birth, document_number,
    passport_number, visa_grant_number, visa_class, visa_applicant, visa_grant_date,
    visa_expiry_date, must_not_arrive_after, enter_before_date, location, visa_status,
    period_of_stay, visa_type, passport_country, application_id, transaction_ref,
    created_at, updated_at
  )
  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
          $18, $19, $20, $21, $22, $23, $24)
"#;

const UPDATE_VISA: &str = r#"
  UPDATE visas SET
    family_name = $3, given_name = $4, visa_description = $5, date_of_birth = $6,
    document_number = $7, passport_number = $8, visa_grant_number = $9, visa_class = $10,
    visa_applicant = $11, visa_grant_date = $12, visa_expiry_date = $13,
    must_not_arrive_after = $14, enter_before_date = $15, location = $16, visa_status = $17,
    period_of_stay = $18, visa_type = $19, passport_country = $20, application_id = $21,
    transaction_ref = $22, updated_at = $23
  WHERE id = $1 AND user_id = $2
"#;

const SEARCH_VISA: &str = r#"
  SELECT * FROM visas
  WHERE lower(visa_grant_number) = lower($1)
    AND (document_number = $2 OR passport_number = $2)
    AND date_of_birth BETWEEN $3 AND $4
  LIMIT 1
"#;

pub struct PgVisaStore {
  pool: PgPool,
}

impl PgVisaStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Connect and make sure the table and indexes exist.
  pub async fn connect(database_url: &str) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(MAX_CONNECTIONS)
      .connect(database_url)
      .await?;
    let store = Self::new(pool);
    store.ensure_schema().await?;
    Ok(store)
  }

  pub async fn ensure_schema(&self) -> StoreResult<()> {
    for statement in SCHEMA {
      query::<Postgres>(statement).execute(&self.pool).await?;
    }
    info!("visas schema ready");
    Ok(())
  }
}

/// Bind the record's own columns as `$3..=$22`, in table order.
fn bind_fields<'q>(
  q: Query<'q, Postgres, PgArguments>,
  visa: &'q Visa,
) -> Query<'q, Postgres, PgArguments> {
  q.bind(&visa.family_name)
    .bind(&visa.given_name)
    .bind(&visa.visa_description)
    .bind(visa.date_of_birth.to_utc_midnight())
    .bind(&visa.document_number)
    .bind(&visa.passport_number)
    .bind(&visa.visa_grant_number)
    .bind(&visa.visa_class)
    .bind(&visa.visa_applicant)
    .bind(visa.visa_grant_date.to_utc_midnight())
    .bind(visa.visa_expiry_date.to_utc_midnight())
    .bind(visa.must_not_arrive_after.map(|d| d.to_utc_midnight()))
    .bind(visa.enter_before_date.map(|d| d.to_utc_midnight()))
    .bind(&visa.location)
    .bind(&visa.visa_status)
    .bind(&visa.period_of_stay)
    .bind(&visa.visa_type)
    .bind(&visa.passport_country)
    .bind(&visa.application_id)
    .bind(&visa.transaction_ref)
}

fn visa_from_row(row: &PgRow) -> Result<Visa, SqlxError> {
  let date = |col: &str| -> Result<NormalizedDate, SqlxError> {
    let instant: DateTime<Utc> = row.try_get(col)?;
    Ok(NormalizedDate::from_utc(&instant))
  };
  let opt_date = |col: &str| -> Result<Option<NormalizedDate>, SqlxError> {
    let instant: Option<DateTime<Utc>> = row.try_get(col)?;
    Ok(instant.as_ref().map(NormalizedDate::from_utc))
  };

  Ok(Visa {
    id: row.try_get("id")?,
    user_id: row.try_get("user_id")?,
    family_name: row.try_get("family_name")?,
    given_name: row.try_get("given_name")?,
    visa_description: row.try_get("visa_description")?,
    date_of_birth: date("date_of_birth")?,
    document_number: row.try_get("document_number")?,
    passport_number: row.try_get("passport_number")?,
    visa_grant_number: row.try_get("visa_grant_number")?,
    visa_class: row.try_get("visa_class")?,
    visa_applicant: row.try_get("visa_applicant")?,
    visa_grant_date: date("visa_grant_date")?,
    visa_expiry_date: date("visa_expiry_date")?,
    must_not_arrive_after: opt_date("must_not_arrive_after")?,
    enter_before_date: opt_date("enter_before_date")?,
    location: row.try_get("location")?,
    visa_status: row.try_get("visa_status")?,
    period_of_stay: row.try_get("period_of_stay")?,
    visa_type: row.try_get("visa_type")?,
    passport_country: row.try_get("passport_country")?,
    application_id: row.try_get("application_id")?,
    transaction_ref: row.try_get("transaction_ref")?,
    created_at: row.try_get("created_at")?,
    updated_at: row.try_get("updated_at")?,
  })
}

/// Unique-index violations become `Conflict`; everything else passes through.
fn write_error(err: SqlxError) -> StoreError {
  let unique = err
    .as_database_error()
    .map(|db| db.is_unique_violation())
    .unwrap_or(false);
  if unique {
    StoreError::Conflict
  } else {
    StoreError::Database(err)
  }
}

#[async_trait]
impl VisaStore for PgVisaStore {
  async fn list(&self, owner: Uuid) -> StoreResult<Vec<Visa>> {
    let rows = query::<Postgres>("SELECT * FROM visas WHERE user_id = $1 ORDER BY created_at DESC")
      .bind(owner)
      .fetch_all(&self.pool)
      .await?;
    let visas = rows.iter().map(visa_from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(visas)
  }

  async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Visa>> {
    let row = query::<Postgres>("SELECT * FROM visas WHERE id = $1 AND user_id = $2")
      .bind(id)
      .bind(owner)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(visa_from_row).transpose()?)
  }

  async fn insert(&self, visa: &Visa) -> StoreResult<()> {
    let q = query::<Postgres>(INSERT_VISA).bind(visa.id).bind(visa.user_id);
    bind_fields(q, visa)
      .bind(visa.created_at)
      .bind(visa.updated_at)
      .execute(&self.pool)
      .await
      .map_err(write_error)?;
    Ok(())
  }

  async fn update(&self, visa: &Visa) -> StoreResult<bool> {
    let q = query::<Postgres>(UPDATE_VISA).bind(visa.id).bind(visa.user_id);
    let result = bind_fields(q, visa)
      .bind(visa.updated_at)
      .execute(&self.pool)
      .await
      .map_err(write_error)?;
    Ok(result.rows_affected() > 0)
  }

  async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
    let result = query::<Postgres>("DELETE FROM visas WHERE id = $1 AND user_id = $2")
      .bind(id)
      .bind(owner)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn find_one(&self, criteria: &SearchCriteria) -> StoreResult<Option<Visa>> {
    let row = query::<Postgres>(SEARCH_VISA)
      .bind(&criteria.visa_grant_number)
      .bind(&criteria.passport_number)
      .bind(criteria.date_of_birth.start)
      .bind(criteria.date_of_birth.end)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(visa_from_row).transpose()?)
  }
}
