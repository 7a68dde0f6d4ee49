use std::collections::BTreeMap;

use jenkins_core::domain::BuildRef;
use jenkins_core::domain::job::{JobInfo, ParameterSpec};

use super::Build;
use crate::JenkinsClient;
use crate::error::Result;

/// A job, as returned by [`JenkinsClient::get_job`]
#[derive(Debug, Clone)]
pub struct Job {
    info: JobInfo,
    client: JenkinsClient,
}

impl Job {
    pub(crate) fn new(info: JobInfo, client: JenkinsClient) -> Self {
        Self { info, client }
    }

    pub fn info(&self) -> &JobInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Ball color; `None` for items that cannot be built (folders)
    pub fn color(&self) -> Option<&str> {
        self.info.color.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.info.description.as_deref()
    }

    /// Every build listed on the job, fetched one by one
    pub fn builds(&self) -> Result<Vec<Build>> {
        self.info
            .builds
            .iter()
            .map(|build| self.build(build.number))
            .collect()
    }

    pub fn build(&self, number: u64) -> Result<Build> {
        self.client.get_build(&self.info.name, number)
    }

    pub fn parameters_definition(&self) -> BTreeMap<String, ParameterSpec> {
        self.info.parameters_definition()
    }

    pub fn xml_config(&self) -> Result<String> {
        self.client.get_job_config(&self.info.name)
    }

    pub fn last_build(&self) -> Result<Option<Build>> {
        self.fetch(self.info.last_build.as_ref())
    }

    pub fn last_successful_build(&self) -> Result<Option<Build>> {
        self.fetch(self.info.last_successful_build.as_ref())
    }

    pub fn launch(&self, parameters: &BTreeMap<String, String>) -> Result<()> {
        self.client.launch_job(&self.info.name, parameters)
    }

    fn fetch(&self, build: Option<&BuildRef>) -> Result<Option<Build>> {
        build.map(|build| self.build(build.number)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::Harness;
    use crate::transport::Method;

    #[test]
    fn test_job_projection() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/job/deploy/api/json",
            r#"{
                "name": "deploy",
                "description": "Ships it",
                "builds": [{"number": 2}, {"number": 1}],
                "actions": [{}, {"parameterDefinitions": [{
                    "name": "TARGET",
                    "type": "ChoiceParameterDefinition",
                    "description": "where",
                    "defaultParameterValue": {"value": "staging"},
                    "choices": ["staging", "prod"]
                }]}],
                "lastBuild": null
            }"#,
        );
        for number in [1, 2] {
            harness.stub.on_get_json(
                &format!("/job/deploy/{number}/api/json"),
                &format!(r#"{{"number": {number}, "url": "u{number}", "timestamp": 0, "duration": 0}}"#),
            );
        }

        let job = harness.client.get_job("deploy").unwrap();
        assert_eq!(job.color(), None);
        assert_eq!(job.description(), Some("Ships it"));

        let parameters = job.parameters_definition();
        let target = &parameters["TARGET"];
        assert_eq!(target.default, Some(serde_json::json!("staging")));
        assert_eq!(target.choices.as_deref().map(<[String]>::len), Some(2));

        assert!(job.last_build().unwrap().is_none());
        let numbers: Vec<u64> = job.builds().unwrap().iter().map(|b| b.number()).collect();
        assert_eq!(numbers, vec![2, 1]);
        assert_eq!(harness.stub.count(Method::Get, "/job/deploy/2/api/json"), 1);
    }
}
