use jenkins_core::domain::test_report::{TestReportInfo, TestSuite};
use serde_json::Value;

/// Test results of one build
#[derive(Debug, Clone)]
pub struct TestReport {
    info: TestReportInfo,
    /// Document as received, for callers that need fields not modeled here
    raw: Value,
    job_name: String,
    build_number: u64,
}

impl TestReport {
    pub(crate) fn new(
        info: TestReportInfo,
        raw: Value,
        job_name: impl Into<String>,
        build_number: u64,
    ) -> Self {
        Self {
            info,
            raw,
            job_name: job_name.into(),
            build_number,
        }
    }

    pub fn info(&self) -> &TestReportInfo {
        &self.info
    }

    /// The report re-serialized as JSON
    pub fn original_test_report(&self) -> String {
        self.raw.to_string()
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn build_number(&self) -> u64 {
        self.build_number
    }

    /// Seconds
    pub fn duration(&self) -> f64 {
        self.info.duration
    }

    pub fn fail_count(&self) -> u32 {
        self.info.fail_count
    }

    pub fn pass_count(&self) -> u32 {
        self.info.pass_count
    }

    pub fn skip_count(&self) -> u32 {
        self.info.skip_count
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.info.suites
    }

    pub fn suite(&self, index: usize) -> Option<&TestSuite> {
        self.info.suites.get(index)
    }

    /// `FAILED` or `PASSED`; `None` when there is no such suite
    pub fn suite_status(&self, index: usize) -> Option<&'static str> {
        self.suite(index).map(TestSuite::status)
    }
}
