//! The single failure kind of the date core.

use thiserror::Error;

use crate::types::RawDateInput;

/// No supported pattern matched the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable date: {input:?}")]
pub struct UnparseableDate {
  pub input: String,
}

impl UnparseableDate {
  pub fn new(input: impl Into<String>) -> Self {
    Self {
      input: input.into(),
    }
  }

  pub(crate) fn from_input(raw: &RawDateInput<'_>) -> Self {
    match raw {
      RawDateInput::Text(s) => Self::new(s.trim()),
      other => Self::new(format!("{:?}", other)),
    }
  }
}
