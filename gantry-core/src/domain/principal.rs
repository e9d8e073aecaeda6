//! Acting user identity

use serde::{Deserialize, Serialize};
use std::fmt;

use super::name::CaseInsensitiveName;

/// User on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(CaseInsensitiveName);

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(CaseInsensitiveName::new(name.into()))
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
