//! Shared application state.

use std::sync::Arc;

use crate::store::VisaStore;

pub struct AppState {
  pub store: Arc<dyn VisaStore>,
}

impl AppState {
  pub fn new(store: Arc<dyn VisaStore>) -> Self {
    Self { store }
  }
}
