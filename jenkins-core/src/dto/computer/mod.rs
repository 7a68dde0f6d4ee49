//! Computer set DTOs

use serde::{Deserialize, Serialize};

/// Response of `/computer/api/json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerSet {
    #[serde(default)]
    pub computer: Vec<ComputerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputerSummary {
    pub display_name: String,
}

impl ComputerSet {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.computer.iter().map(|c| c.display_name.as_str())
    }
}
