//! Work item identifier value object

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Identifier assigned to a work item by the tracking backend
///
/// Always positive. Never mutated after the backend assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct WorkItemId(i64);

impl WorkItemId {
    /// Create a work item id, rejecting zero and negative values
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id < 1 {
            return Err(DomainError::InvalidWorkItemId(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::InvalidWorkItemId(s.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<i64> for WorkItemId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkItemId> for i64 {
    fn from(id: WorkItemId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_id_is_accepted() {
        let id = WorkItemId::new(42).unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(WorkItemId::new(0).is_err());
        assert!(WorkItemId::new(-7).is_err());
    }

    #[test]
    fn parses_from_string() {
        assert_eq!("17".parse::<WorkItemId>().unwrap().value(), 17);
        assert_eq!(" 17 ".parse::<WorkItemId>().unwrap().value(), 17);
        assert!("abc".parse::<WorkItemId>().is_err());
        assert!("".parse::<WorkItemId>().is_err());
        assert!("0".parse::<WorkItemId>().is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let id = WorkItemId::new(5).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");

        let parsed: WorkItemId = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn deserialization_rejects_non_positive() {
        assert!(serde_json::from_str::<WorkItemId>("0").is_err());
        assert!(serde_json::from_str::<WorkItemId>("-3").is_err());
    }
}
