//! In-process store. Used when no database is configured, and by tests.

use axum::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SearchCriteria, StoreError, StoreResult, VisaStore};
use crate::visa::Visa;

#[derive(Debug, Default)]
pub struct MemoryVisaStore {
  visas: RwLock<Vec<Visa>>,
}

impl MemoryVisaStore {
  pub fn new() -> Self {
    Self::default()
  }
}

/// Same key as the database's unique index.
fn same_key(a: &Visa, b: &Visa) -> bool {
  a.visa_grant_number == b.visa_grant_number && a.document_number == b.document_number
}

#[async_trait]
impl VisaStore for MemoryVisaStore {
  async fn list(&self, owner: Uuid) -> StoreResult<Vec<Visa>> {
    let visas = self.visas.read().await;
    let mut out: Vec<Visa> = visas.iter().filter(|v| v.user_id == owner).cloned().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(out)
  }

  async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Visa>> {
    let visas = self.visas.read().await;
    Ok(visas.iter().find(|v| v.id == id && v.user_id == owner).cloned())
  }

  async fn insert(&self, visa: &Visa) -> StoreResult<()> {
    let mut visas = self.visas.write().await;
    if visas.iter().any(|v| same_key(v, visa)) {
      return Err(StoreError::Conflict);
    }
    visas.push(visa.clone());
    Ok(())
  }

  async fn update(&self, visa: &Visa) -> StoreResult<bool> {
    let mut visas = self.visas.write().await;
    if visas.iter().any(|v| v.id != visa.id && same_key(v, visa)) {
      return Err(StoreError::Conflict);
    }
    match visas
      .iter_mut()
      .find(|v| v.id == visa.id && v.user_id == visa.user_id)
    {
      Some(slot) => {
        *slot = visa.clone();
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
    let mut visas = self.visas.write().await;
    let before = visas.len();
    visas.retain(|v| !(v.id == id && v.user_id == owner));
    Ok(visas.len() != before)
  }

  async fn find_one(&self, criteria: &SearchCriteria) -> StoreResult<Option<Visa>> {
    let visas = self.visas.read().await;
    Ok(visas.iter().find(|v| criteria.matches(v)).cloned())
  }
}
