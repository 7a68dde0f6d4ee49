//! Test report domain types

use serde::{Deserialize, Serialize};

/// Payload of `/job/{name}/{number}/testReport/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReportInfo {
    pub duration: f64,
    pub fail_count: u32,
    pub pass_count: u32,
    pub skip_count: u32,
    #[serde(default)]
    pub suites: Vec<TestSuite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    pub name: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// `FAILED` as soon as one case failed, `PASSED` otherwise
    pub fn status(&self) -> &'static str {
        if self.cases.iter().any(|case| case.status == "FAILED") {
            "FAILED"
        } else {
            "PASSED"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub class_name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub error_details: Option<String>,
}
