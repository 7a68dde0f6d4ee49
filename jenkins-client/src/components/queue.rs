use std::collections::BTreeMap;

use jenkins_core::domain::queue::{QueueInfo, QueueItem};
use serde_json::Value;

use crate::JenkinsClient;
use crate::error::Result;

/// Snapshot of the build queue
#[derive(Debug, Clone)]
pub struct Queue {
    info: QueueInfo,
    client: JenkinsClient,
}

impl Queue {
    pub(crate) fn new(info: QueueInfo, client: JenkinsClient) -> Self {
        Self { info, client }
    }

    pub fn info(&self) -> &QueueInfo {
        &self.info
    }

    pub fn job_queues(&self) -> Vec<JobQueue> {
        self.info
            .items
            .iter()
            .map(|item| JobQueue::new(item.clone(), self.client.clone()))
            .collect()
    }
}

/// One queued build request
#[derive(Debug, Clone)]
pub struct JobQueue {
    item: QueueItem,
    client: JenkinsClient,
}

impl JobQueue {
    pub(crate) fn new(item: QueueItem, client: JenkinsClient) -> Self {
        Self { item, client }
    }

    pub fn item(&self) -> &QueueItem {
        &self.item
    }

    pub fn id(&self) -> u64 {
        self.item.id
    }

    pub fn job_name(&self) -> &str {
        &self.item.task.name
    }

    /// Why the item is still waiting, as worded by the server
    pub fn why(&self) -> Option<&str> {
        self.item.why.as_deref()
    }

    pub fn input_parameters(&self) -> BTreeMap<String, Option<Value>> {
        jenkins_core::domain::input_parameters(&self.item.actions)
    }

    pub fn cancel(&self) -> Result<()> {
        self.client.cancel_queue(self)
    }
}
