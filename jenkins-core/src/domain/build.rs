//! Build domain types
//!
//! Jenkins reports times in milliseconds since the epoch; the accessors here
//! expose whole seconds, truncating like the server-side UI does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Action;

/// Tree filter applied to build lookups unless the caller overrides it
pub const DEFAULT_BUILD_TREE: &str = "actions[parameters,parameters[name,value]],result,duration,timestamp,number,url,estimatedDuration,builtOn";

/// Payload of `/job/{name}/{number}/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub number: u64,
    pub url: String,
    /// Start time, milliseconds since the epoch
    pub timestamp: i64,
    /// Milliseconds; zero while the build is still running
    pub duration: i64,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<i64>,
    /// Computer name; empty for the built-in node
    #[serde(default)]
    pub built_on: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl BuildInfo {
    pub fn timestamp_secs(&self) -> i64 {
        self.timestamp / 1000
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration / 1000
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Server-side estimate in seconds, when the server publishes one
    pub fn estimated_duration_secs(&self) -> Option<f64> {
        self.estimated_duration.map(|millis| millis as f64 / 1000.0)
    }

    pub fn status(&self) -> Option<BuildStatus> {
        BuildStatus::from_result(self.result.as_deref())
    }

    pub fn is_running(&self) -> bool {
        self.status() == Some(BuildStatus::Running)
    }
}

/// Build outcome as reported in the `result` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStatus {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
    /// No result yet
    Running,
}

impl BuildStatus {
    /// Map a raw `result` value; a missing or `"null"` result means the build
    /// is still running. Unknown values yield `None`.
    pub fn from_result(result: Option<&str>) -> Option<Self> {
        match result {
            None | Some("null") => Some(Self::Running),
            Some("SUCCESS") => Some(Self::Success),
            Some("UNSTABLE") => Some(Self::Unstable),
            Some("FAILURE") => Some(Self::Failure),
            Some("NOT_BUILT") => Some(Self::NotBuilt),
            Some("ABORTED") => Some(Self::Aborted),
            Some(_) => None,
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "SUCCESS"),
            BuildStatus::Unstable => write!(f, "UNSTABLE"),
            BuildStatus::Failure => write!(f, "FAILURE"),
            BuildStatus::NotBuilt => write!(f, "NOT_BUILT"),
            BuildStatus::Aborted => write!(f, "ABORTED"),
            BuildStatus::Running => write!(f, "null"),
        }
    }
}

/// Estimate the total duration in seconds from elapsed time and the executor's
/// progress percentage. Progress must be strictly positive.
pub fn estimate_from_progress(now_secs: i64, started_secs: i64, progress: i32) -> Option<f64> {
    if progress <= 0 {
        return None;
    }
    let elapsed = (now_secs - started_secs) as f64;
    Some((elapsed * 100.0 / f64::from(progress)).ceil())
}

/// Seconds left before the estimate is reached, never negative
pub fn remaining_execution_time(estimated_secs: f64, now_secs: i64, started_secs: i64) -> i64 {
    let remaining = estimated_secs as i64 - (now_secs - started_secs);
    remaining.max(0)
}
