//! Case-insensitive entity names

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name compared, ordered and hashed by its lower-cased form.
///
/// The original spelling is kept for display so user-facing messages echo
/// the name the way it was written in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CaseInsensitiveName {
    original: String,
    normalized: String,
}

/// Pipeline identity
pub type PipelineName = CaseInsensitiveName;

/// Environment identity
pub type EnvironmentName = CaseInsensitiveName;

impl CaseInsensitiveName {
    pub fn new(name: impl Into<String>) -> Self {
        let original = name.into();
        let normalized = original.to_lowercase();
        Self {
            original,
            normalized,
        }
    }

    /// The name as written
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The lower-cased form used for comparisons
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.original.trim().is_empty()
    }
}

impl PartialEq for CaseInsensitiveName {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for CaseInsensitiveName {}

impl Hash for CaseInsensitiveName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for CaseInsensitiveName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CaseInsensitiveName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl fmt::Display for CaseInsensitiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl From<String> for CaseInsensitiveName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for CaseInsensitiveName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<CaseInsensitiveName> for String {
    fn from(name: CaseInsensitiveName) -> Self {
        name.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_case() {
        assert_eq!(PipelineName::new("Build-App"), PipelineName::new("build-app"));
        assert_ne!(PipelineName::new("build-app"), PipelineName::new("build-api"));
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut names = HashSet::new();
        names.insert(PipelineName::new("DEPLOY"));
        assert!(names.contains(&PipelineName::new("deploy")));
    }

    #[test]
    fn test_display_keeps_original_spelling() {
        let name = PipelineName::new("Build-App");
        assert_eq!(name.to_string(), "Build-App");
        assert_eq!(name.normalized(), "build-app");
    }

    #[test]
    fn test_serde_is_plain_string() {
        let name = PipelineName::new("Build-App");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Build-App\"");

        let back: PipelineName = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "Build-App");
    }
}
