//! Build projection
//!
//! Timing accessors work in whole seconds. Executor lookups only happen for
//! running builds and cost one request per executor slot.

use std::collections::BTreeMap;

use chrono::Utc;
use jenkins_core::domain::build::{self, BuildInfo, BuildStatus};
use serde_json::Value;

use super::{Executor, TestReport};
use crate::JenkinsClient;
use crate::error::Result;

/// Name Jenkins gives the controller's own computer
const BUILT_IN_NODE: &str = "(built-in)";

#[derive(Debug, Clone)]
pub struct Build {
    info: BuildInfo,
    job_name: String,
    client: JenkinsClient,
}

impl Build {
    pub(crate) fn new(info: BuildInfo, job_name: impl Into<String>, client: JenkinsClient) -> Self {
        Self {
            info,
            job_name: job_name.into(),
            client,
        }
    }

    pub fn info(&self) -> &BuildInfo {
        &self.info
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn number(&self) -> u64 {
        self.info.number
    }

    pub fn url(&self) -> &str {
        &self.info.url
    }

    /// Start time in seconds since the epoch
    pub fn timestamp(&self) -> i64 {
        self.info.timestamp_secs()
    }

    /// Duration in seconds
    pub fn duration(&self) -> i64 {
        self.info.duration_secs()
    }

    /// `None` when the server reports a result this client does not know
    pub fn result(&self) -> Option<BuildStatus> {
        self.info.status()
    }

    pub fn is_running(&self) -> bool {
        self.info.is_running()
    }

    /// Computer name; empty when the build ran on the built-in node
    pub fn built_on(&self) -> &str {
        &self.info.built_on
    }

    pub fn input_parameters(&self) -> BTreeMap<String, Option<Value>> {
        jenkins_core::domain::input_parameters(&self.info.actions)
    }

    /// Executor currently running this build
    ///
    /// Returns `None` without any request when the build is finished.
    pub fn executor(&self) -> Result<Option<Executor>> {
        if !self.is_running() {
            return Ok(None);
        }

        let node = match self.info.built_on.as_str() {
            "" => BUILT_IN_NODE,
            name => name,
        };
        let computer = self.client.get_computer(node)?;
        let executors = self.client.get_executors(&computer)?;

        Ok(executors
            .into_iter()
            .rev()
            .find(|executor| executor.build_url() == Some(self.url())))
    }

    /// Progress percentage reported by the executor running this build
    pub fn progress(&self) -> Result<Option<i32>> {
        Ok(self.executor()?.map(|executor| executor.progress()))
    }

    /// Expected total duration in seconds
    ///
    /// Uses the server estimate when published, otherwise extrapolates from the
    /// executor's progress.
    pub fn estimated_duration(&self) -> Result<Option<f64>> {
        if let Some(estimate) = self.info.estimated_duration_secs() {
            return Ok(Some(estimate));
        }

        let estimate = self.progress()?.and_then(|progress| {
            build::estimate_from_progress(Utc::now().timestamp(), self.timestamp(), progress)
        });
        Ok(estimate)
    }

    /// Seconds left until the estimated end, never negative
    pub fn remaining_execution_time(&self) -> Result<Option<i64>> {
        let now = Utc::now().timestamp();
        Ok(self
            .estimated_duration()?
            .map(|estimate| build::remaining_execution_time(estimate, now, self.timestamp())))
    }

    pub fn console_text(&self) -> Result<String> {
        self.client.get_console_text(&self.job_name, self.info.number)
    }

    pub fn test_report(&self) -> Result<TestReport> {
        self.client.get_test_report(&self.job_name, self.info.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use crate::transport::Method;

    const RUNNING_URL: &str = "http://ci.local:8080/job/foo/7/";

    fn running_build(harness: &Harness, built_on: &str) -> Build {
        harness.stub.on_get_json(
            "/job/foo/7/api/json",
            &format!(
                r#"{{"number": 7, "url": "{RUNNING_URL}", "timestamp": 1000000000000,
                    "duration": 0, "result": null, "builtOn": "{built_on}"}}"#
            ),
        );
        harness.client.get_build("foo", 7).unwrap()
    }

    fn executors_on(harness: &Harness, computer: &str, slots: &[&str]) {
        harness.stub.on_get_json(
            "/api/json",
            &format!(r#"{{"jobs": [], "numExecutors": {}}}"#, slots.len()),
        );
        harness.stub.on_get_json(
            &format!("/computer/{computer}/api/json"),
            r#"{"displayName": "node1"}"#,
        );
        for (slot, body) in slots.iter().enumerate() {
            harness
                .stub
                .on_get_json(&format!("/computer/{computer}/executors/{slot}/api/json"), body);
        }
    }

    #[test]
    fn test_timing_in_seconds() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/job/foo/1/api/json",
            r#"{"timestamp": 1000000000000, "duration": 5000, "number": 1,
                "url": "http://ci.local:8080/job/foo/1/", "result": "SUCCESS", "builtOn": "node1"}"#,
        );

        let build = harness.client.get_build("foo", 1).unwrap();
        assert_eq!(build.timestamp(), 1_000_000_000);
        assert_eq!(build.duration(), 5);
        assert_eq!(build.result(), Some(BuildStatus::Success));
        assert!(!build.is_running());
        assert_eq!(build.built_on(), "node1");
    }

    #[test]
    fn test_finished_build_has_no_executor() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/job/foo/1/api/json",
            r#"{"timestamp": 0, "duration": 1, "number": 1, "url": "u", "result": "FAILURE"}"#,
        );
        let build = harness.client.get_build("foo", 1).unwrap();
        let before = harness.stub.requests().len();

        assert!(build.executor().unwrap().is_none());
        assert!(build.progress().unwrap().is_none());
        assert_eq!(harness.stub.requests().len(), before);
    }

    #[test]
    fn test_running_build_finds_its_executor() {
        let harness = Harness::new();
        let build = running_build(&harness, "node1");
        executors_on(
            &harness,
            "node1",
            &[
                r#"{"number": 0, "idle": true}"#,
                &format!(
                    r#"{{"number": 1, "progress": 40, "currentExecutable": {{"number": 7, "url": "{RUNNING_URL}"}}}}"#
                ),
            ],
        );

        assert!(build.is_running());
        assert_eq!(build.result(), Some(BuildStatus::Running));
        let executor = build.executor().unwrap().unwrap();
        assert_eq!(executor.number(), 1);
        assert_eq!(executor.progress(), 40);
        assert_eq!(executor.build_number(), Some(7));
        assert_eq!(harness.stub.count(Method::Get, "/computer/node1/api/json"), 1);
    }

    #[test]
    fn test_running_build_without_matching_executor() {
        let harness = Harness::new();
        let build = running_build(&harness, "");
        executors_on(&harness, "%28built-in%29", &[r#"{"number": 0, "idle": true}"#]);

        assert!(build.executor().unwrap().is_none());
        assert_eq!(build.estimated_duration().unwrap(), None);
        assert_eq!(build.remaining_execution_time().unwrap(), None);
    }

    #[test]
    fn test_server_estimate_wins() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/job/foo/2/api/json",
            r#"{"number": 2, "url": "u", "timestamp": 0, "duration": 0,
                "result": "SUCCESS", "estimatedDuration": 90500}"#,
        );

        let build = harness.client.get_build("foo", 2).unwrap();
        assert_eq!(build.estimated_duration().unwrap(), Some(90.5));
        // Started at the epoch, so the estimate is long exceeded.
        assert_eq!(build.remaining_execution_time().unwrap(), Some(0));
    }

    #[test]
    fn test_input_parameters() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/job/foo/3/api/json",
            r#"{"number": 3, "url": "u", "timestamp": 0, "duration": 0, "result": "SUCCESS",
                "actions": [{}, {"parameters": [{"name": "BRANCH", "value": "main"}]}]}"#,
        );

        let build = harness.client.get_build("foo", 3).unwrap();
        let parameters = build.input_parameters();
        assert_eq!(parameters["BRANCH"], Some(serde_json::json!("main")));
    }
}
