//! Lifecycle flag shared by the reference registries (users, operators,
//! associations, drivers, terminals, loading zones, restrictions).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "Active",
            RecordStatus::Inactive => "Inactive",
            RecordStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Active" => Ok(RecordStatus::Active),
            "Inactive" => Ok(RecordStatus::Inactive),
            "Suspended" => Ok(RecordStatus::Suspended),
            other => Err(format!("Unknown status '{}'", other)),
        }
    }
}
