use jenkins_core::domain::view::ViewInfo;

use super::Job;
use crate::JenkinsClient;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct View {
    info: ViewInfo,
    client: JenkinsClient,
}

impl View {
    pub(crate) fn new(info: ViewInfo, client: JenkinsClient) -> Self {
        Self { info, client }
    }

    pub fn info(&self) -> &ViewInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn description(&self) -> Option<&str> {
        self.info.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.info.url.as_deref()
    }

    /// Every job of the view, fetched one by one
    pub fn jobs(&self) -> Result<Vec<Job>> {
        self.info
            .jobs
            .iter()
            .map(|job| self.client.get_job(&job.name))
            .collect()
    }

    /// Worst color among the view's jobs
    pub fn color(&self) -> String {
        self.info.color()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::Harness;

    #[test]
    fn test_view_jobs() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/view/ops/api/json",
            r#"{"name": "ops", "url": "http://ci.local:8080/view/ops/",
                "jobs": [{"name": "deploy", "color": "yellow"}]}"#,
        );
        harness
            .stub
            .on_get_json("/job/deploy/api/json", r#"{"name": "deploy", "color": "yellow"}"#);

        let view = harness.client.get_view("ops").unwrap();
        assert_eq!(view.url(), Some("http://ci.local:8080/view/ops/"));
        assert_eq!(view.description(), None);
        assert_eq!(view.color(), "yellow");

        let jobs = view.jobs().unwrap();
        assert_eq!(jobs[0].name(), "deploy");
    }
}
