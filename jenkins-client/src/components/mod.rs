//! Projections over decoded records
//!
//! Each component wraps one record from `jenkins-core` together with a client
//! clone for follow-up requests. The client never keeps track of components it
//! returned.

mod build;
mod computer;
mod executor;
mod job;
mod queue;
mod test_report;
mod view;

pub use build::Build;
pub use computer::Computer;
pub use executor::Executor;
pub use job::Job;
pub use queue::{JobQueue, Queue};
pub use test_report::TestReport;
pub use view::View;
