//! Build queue endpoints

use jenkins_core::domain::queue::QueueInfo;
use tracing::info;

use crate::JenkinsClient;
use crate::components::{JobQueue, Queue};
use crate::error::Result;

impl JenkinsClient {
    pub fn get_queue(&self) -> Result<Queue> {
        let info: QueueInfo = self.get_json("/queue/api/json")?;
        Ok(Queue::new(info, self.clone()))
    }

    /// Remove an item from the build queue
    pub fn cancel_queue(&self, item: &JobQueue) -> Result<()> {
        self.cancel_queue_item(item.id())
    }

    pub fn cancel_queue_item(&self, id: u64) -> Result<()> {
        self.post(self.api_request(format!("/queue/item/{id}/cancelQueue")))?;
        info!(id, "queue item cancelled");
        Ok(())
    }
}
