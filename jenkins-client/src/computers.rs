//! Computer and executor endpoints
//!
//! Listing computers and executors fans out into one request per entry. The
//! requests run one after another and the first failure aborts the listing.

use jenkins_core::domain::computer::{ComputerInfo, ExecutorInfo};
use jenkins_core::dto::computer::ComputerSet;
use tracing::info;
use urlencoding::encode;

use crate::JenkinsClient;
use crate::components::{Computer, Executor};
use crate::error::Result;

impl JenkinsClient {
    pub fn get_computers(&self) -> Result<Vec<Computer>> {
        let set: ComputerSet = self.get_json("/computer/api/json")?;
        set.names().map(|name| self.get_computer(name)).collect()
    }

    pub fn get_computer(&self, name: &str) -> Result<Computer> {
        let info: ComputerInfo = self.get_json(format!("/computer/{}/api/json", encode(name)))?;
        Ok(Computer::new(info, self.clone()))
    }

    /// Executors of a computer; the slot count comes from the root snapshot
    pub fn get_executors(&self, computer: &Computer) -> Result<Vec<Executor>> {
        let count = self.root()?.executor_count();
        let name = encode(computer.name());

        (0..count)
            .map(|slot| -> Result<Executor> {
                let info: ExecutorInfo =
                    self.get_json(format!("/computer/{name}/executors/{slot}/api/json"))?;
                Ok(Executor::new(info, computer.clone(), self.clone()))
            })
            .collect()
    }

    pub fn toggle_offline_computer(&self, name: &str) -> Result<()> {
        self.post(self.api_request(format!("/computer/{}/toggleOffline", encode(name))))?;
        info!(computer = name, "computer offline state toggled");
        Ok(())
    }

    pub fn delete_computer(&self, name: &str) -> Result<()> {
        self.post(self.api_request(format!("/computer/{}/doDelete", encode(name))))?;
        info!(computer = name, "computer deleted");
        Ok(())
    }

    /// Raw XML configuration of a computer
    pub fn get_computer_configuration(&self, name: &str) -> Result<String> {
        self.get_text(format!("/computer/{}/config.xml", encode(name)))
    }

    /// Interrupt whatever runs on an executor
    pub fn stop_executor(&self, executor: &Executor) -> Result<()> {
        let path = format!(
            "/computer/{}/executors/{}/stop",
            encode(executor.computer().name()),
            executor.number()
        );
        self.post(self.api_request(path))
    }
}
