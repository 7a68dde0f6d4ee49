//! Computer and executor domain types
//!
//! A computer is a build agent (the controller included). Each one exposes a
//! fixed number of executor slots, at most one build per slot.

use serde::{Deserialize, Serialize};

use super::BuildRef;

/// Payload of `/computer/{name}/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputerInfo {
    pub display_name: String,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub temporarily_offline: bool,
    #[serde(default)]
    pub idle: bool,
    /// Null while the computer is launching, an object once it was put offline
    #[serde(default)]
    pub offline_cause: Option<serde_json::Value>,
}

/// Payload of `/computer/{name}/executors/{n}/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorInfo {
    pub number: u32,
    #[serde(default)]
    pub idle: bool,
    #[serde(default)]
    pub likely_stuck: bool,
    /// Percentage, -1 when idle
    #[serde(default = "no_progress")]
    pub progress: i32,
    #[serde(default)]
    pub current_executable: Option<BuildRef>,
}

fn no_progress() -> i32 {
    -1
}

impl ExecutorInfo {
    pub fn build_number(&self) -> Option<u64> {
        self.current_executable.as_ref().map(|build| build.number)
    }

    pub fn build_url(&self) -> Option<&str> {
        self.current_executable
            .as_ref()
            .and_then(|build| build.url.as_deref())
    }
}
