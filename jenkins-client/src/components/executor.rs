use jenkins_core::domain::computer::ExecutorInfo;

use super::Computer;
use crate::JenkinsClient;
use crate::error::Result;

/// One executor slot of a computer
#[derive(Debug, Clone)]
pub struct Executor {
    info: ExecutorInfo,
    computer: Computer,
    client: JenkinsClient,
}

impl Executor {
    pub(crate) fn new(info: ExecutorInfo, computer: Computer, client: JenkinsClient) -> Self {
        Self {
            info,
            computer,
            client,
        }
    }

    pub fn info(&self) -> &ExecutorInfo {
        &self.info
    }

    pub fn number(&self) -> u32 {
        self.info.number
    }

    /// Percentage of the estimated duration elapsed, -1 when idle
    pub fn progress(&self) -> i32 {
        self.info.progress
    }

    pub fn build_number(&self) -> Option<u64> {
        self.info.build_number()
    }

    pub fn build_url(&self) -> Option<&str> {
        self.info.build_url()
    }

    pub fn is_idle(&self) -> bool {
        self.info.idle
    }

    pub fn is_likely_stuck(&self) -> bool {
        self.info.likely_stuck
    }

    pub fn computer(&self) -> &Computer {
        &self.computer
    }

    /// Abort the build running on this executor
    pub fn stop(&self) -> Result<()> {
        self.client.stop_executor(self)
    }
}
