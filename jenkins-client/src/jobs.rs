//! Job and build endpoints

use std::collections::BTreeMap;

use jenkins_core::domain::build::{BuildInfo, DEFAULT_BUILD_TREE};
use jenkins_core::domain::job::JobInfo;
use jenkins_core::domain::test_report::TestReportInfo;
use tracing::info;
use urlencoding::encode;

use crate::components::{Build, Job, TestReport};
use crate::error::{ClientError, Result};
use crate::promise::Promise;
use crate::transport::{CONTENT_TYPE, Fields, HttpResponse, Method};
use crate::{JenkinsClient, check_status, decode_json, ignore_body};

const XML: &str = "text/xml";

impl JenkinsClient {
    /// Names of every top-level job, from the root snapshot
    pub fn get_all_jobs(&self) -> Result<Vec<String>> {
        Ok(self.root()?.job_names())
    }

    /// Every top-level job, fetched one by one
    pub fn get_jobs(&self) -> Result<Vec<Job>> {
        self.get_all_jobs()?
            .iter()
            .map(|name| self.get_job(name))
            .collect()
    }

    pub fn get_job(&self, name: &str) -> Result<Job> {
        let info: JobInfo = self.get_json(format!("/job/{}/api/json", encode(name)))?;
        Ok(Job::new(info, self.clone()))
    }

    /// Trigger a build
    ///
    /// Without parameters this posts to `/build`; otherwise the parameters are
    /// sent as a multipart form to `/buildWithParameters`.
    pub fn launch_job(&self, name: &str, parameters: &BTreeMap<String, String>) -> Result<()> {
        let job = encode(name);
        let request = if parameters.is_empty() {
            self.api_request(format!("/job/{job}/build"))
        } else {
            self.api_request(format!("/job/{job}/buildWithParameters"))
                .with_fields(Fields::form(parameters.clone()))
        };

        self.post(request)?;
        info!(job = name, parameters = parameters.len(), "build launched");
        Ok(())
    }

    /// Ask the server to delete a job
    ///
    /// The request is dispatched without waiting; the returned promise settles
    /// once the server answered. Dropping the promise leaves the request
    /// running, but it is cancelled if the transport's runtime shuts down
    /// first (for [`ReqwestTransport`](crate::ReqwestTransport), when the last
    /// client clone goes away). Waiting then fails with a `Request` error
    /// naming the `doDelete` path.
    pub fn delete_job(&self, name: &str) -> Promise<(), ClientError> {
        let request = self.api_request(format!("/job/{}/doDelete", encode(name)));
        self.submit(Method::Post, &request, ignore_body)
            .unwrap_or_else(Promise::rejected)
    }

    /// Fetch a build with the default tree filter
    pub fn get_build(&self, job_name: &str, number: u64) -> Result<Build> {
        self.get_build_with_tree(job_name, number, Some(DEFAULT_BUILD_TREE))
    }

    /// Fetch a build, restricting fields with `tree`; `None` fetches everything
    pub fn get_build_with_tree(
        &self,
        job_name: &str,
        number: u64,
        tree: Option<&str>,
    ) -> Result<Build> {
        let mut path = format!("/job/{}/{number}/api/json", encode(job_name));
        if let Some(tree) = tree {
            path.push_str("?tree=");
            path.push_str(&encode(tree));
        }

        let info: BuildInfo = self.get_json(path)?;
        Ok(Build::new(info, job_name, self.clone()))
    }

    pub fn get_job_config(&self, name: &str) -> Result<String> {
        self.get_text(format!("/job/{}/config.xml", encode(name)))
    }

    /// Replace a job's XML configuration
    ///
    /// An empty `config_xml` is posted without a body.
    pub fn set_job_config(&self, name: &str, config_xml: &str) -> Result<()> {
        let request = self
            .api_request(format!("/job/{}/config.xml", encode(name)))
            .with_header(CONTENT_TYPE, XML)
            .with_fields(Fields::Raw(config_xml.to_string()));
        self.post(request)
    }

    /// Create a job from an XML configuration
    ///
    /// Fails with [`ClientError::JobAlreadyExists`] when the server reports a
    /// job with that name.
    pub fn create_job(&self, name: &str, config_xml: &str) -> Result<()> {
        let request = self
            .api_request(format!("/createItem?name={}", encode(name)))
            .with_header(CONTENT_TYPE, XML)
            .with_fields(Fields::Raw(config_xml.to_string()));

        let job = name.to_string();
        self.execute(Method::Post, &request, move |path: &str, response: HttpResponse| {
            // Jenkins explains refused creations in X-Error
            let conflict = response
                .header("X-Error")
                .is_some_and(|reason| reason.contains("already exists"));
            if conflict {
                return Err(ClientError::JobAlreadyExists { name: job });
            }
            check_status(path, &response)
        })?;

        info!(job = name, "job created");
        Ok(())
    }

    pub fn get_console_text(&self, job_name: &str, number: u64) -> Result<String> {
        self.get_text(format!("/job/{}/{number}/consoleText", encode(job_name)))
    }

    pub fn get_test_report(&self, job_name: &str, number: u64) -> Result<TestReport> {
        let path = format!("/job/{}/{number}/testReport/api/json", encode(job_name));
        let raw: serde_json::Value = self.get_json(path.clone())?;
        let info = serde_json::from_value::<TestReportInfo>(raw.clone())
            .map_err(|error| ClientError::protocol(path, error))?;
        Ok(TestReport::new(info, raw, job_name, number))
    }
}
