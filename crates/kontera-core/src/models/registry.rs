//! Cost-bearer registry records.

use serde::{Deserialize, Serialize};

/// One row of the external payroll/cost-center registry.
///
/// Supplied by the tabular-data collaborator. The pipeline treats the
/// registry as read-only; row order and duplicates are the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Given (first) name.
    pub given_name: String,

    /// Family (last) name, possibly multi-part.
    pub family_name: String,

    /// Cost-center identifier this person is billed against.
    pub cost_center: String,

    /// Phone number, if the registry carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Department name, if the registry carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl RegistryRecord {
    /// Full personal name as "given family".
    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.given_name.clone()
        } else {
            format!("{} {}", self.given_name, self.family_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let record = RegistryRecord {
            given_name: "Annlaug".to_string(),
            family_name: "Amundsen".to_string(),
            cost_center: "4501".to_string(),
            phone: None,
            department: None,
        };
        assert_eq!(record.full_name(), "Annlaug Amundsen");
    }

    #[test]
    fn test_full_name_without_family_name() {
        let record = RegistryRecord {
            given_name: "Andreas".to_string(),
            family_name: String::new(),
            cost_center: "4502".to_string(),
            phone: None,
            department: None,
        };
        assert_eq!(record.full_name(), "Andreas");
    }
}
