use jenkins_core::domain::computer::ComputerInfo;
use serde_json::Value;

use super::Executor;
use crate::JenkinsClient;
use crate::error::Result;

/// A build agent, the controller included
#[derive(Debug, Clone)]
pub struct Computer {
    info: ComputerInfo,
    client: JenkinsClient,
}

impl Computer {
    pub(crate) fn new(info: ComputerInfo, client: JenkinsClient) -> Self {
        Self { info, client }
    }

    pub fn info(&self) -> &ComputerInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.display_name
    }

    pub fn is_offline(&self) -> bool {
        self.info.offline
    }

    /// Why the computer was put offline, as reported by the server
    pub fn offline_cause(&self) -> Option<&Value> {
        self.info.offline_cause.as_ref().filter(|cause| !cause.is_null())
    }

    pub fn toggle_offline(&self) -> Result<()> {
        self.client.toggle_offline_computer(self.name())
    }

    pub fn delete(&self) -> Result<()> {
        self.client.delete_computer(self.name())
    }

    pub fn configuration(&self) -> Result<String> {
        self.client.get_computer_configuration(self.name())
    }

    pub fn executors(&self) -> Result<Vec<Executor>> {
        self.client.get_executors(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::Harness;
    use crate::transport::Method;

    #[test]
    fn test_computer_projection() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/computer/node1/api/json",
            r#"{"displayName": "node1", "offline": true,
                "offlineCause": {"description": "disk full"}}"#,
        );
        harness.stub.on_get_json("/api/json", r#"{"jobs": []}"#);
        harness.stub.on_get_json(
            "/computer/node1/executors/0/api/json",
            r#"{"number": 0, "idle": false, "likelyStuck": true, "progress": 12,
                "currentExecutable": {"number": 4, "url": "http://ci.local:8080/job/foo/4/"}}"#,
        );
        harness.stub.on_post("/computer/node1/toggleOffline", 302);
        harness.stub.on_post("/computer/node1/executors/0/stop", 302);

        let node = harness.client.get_computer("node1").unwrap();
        assert!(node.is_offline());
        assert_eq!(node.offline_cause().unwrap()["description"], "disk full");
        node.toggle_offline().unwrap();

        let executors = node.executors().unwrap();
        let executor = &executors[0];
        assert!(!executor.is_idle());
        assert!(executor.is_likely_stuck());
        assert_eq!(executor.computer().name(), "node1");
        assert_eq!(executor.build_url(), Some("http://ci.local:8080/job/foo/4/"));

        executor.stop().unwrap();
        assert_eq!(harness.stub.count(Method::Post, "/computer/node1/executors/0/stop"), 1);
        assert_eq!(harness.stub.count(Method::Post, "/computer/node1/toggleOffline"), 1);
    }

    #[test]
    fn test_null_offline_cause() {
        let harness = Harness::new();
        harness.stub.on_get_json(
            "/computer/node2/api/json",
            r#"{"displayName": "node2", "offlineCause": null}"#,
        );

        let node = harness.client.get_computer("node2").unwrap();
        assert!(!node.is_offline());
        assert!(node.offline_cause().is_none());
    }
}
