//! Root metadata snapshot
//!
//! The document served at `/api/json`: every top-level job, every view, the
//! primary view and the controller's executor count.

use serde::{Deserialize, Serialize};

/// Decoded top-level Jenkins document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootInfo {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
    #[serde(default)]
    pub views: Vec<ViewSummary>,
    #[serde(default)]
    pub primary_view: Option<ViewSummary>,
    #[serde(default)]
    pub num_executors: Option<u32>,
}

impl RootInfo {
    /// Job names in document order, without duplicates
    pub fn job_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            if !names.contains(&job.name) {
                names.push(job.name.clone());
            }
        }
        names
    }

    /// Executor slots per computer; Jenkins omits the field on some setups
    pub fn executor_count(&self) -> u32 {
        self.num_executors.unwrap_or(1)
    }

    pub fn primary_view_name(&self) -> Option<&str> {
        self.primary_view
            .as_ref()
            .map(|view| view.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Job entry as listed by the root document or a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// View entry as listed by the root document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_decodes_with_defaults() {
        let root: RootInfo = serde_json::from_value(json!({
            "jobs": [{"name": "build"}, {"name": "deploy", "color": "blue"}, {"name": "build"}],
            "primaryView": {"name": "all", "url": "http://ci/"}
        }))
        .unwrap();

        assert_eq!(root.job_names(), vec!["build", "deploy"]);
        assert!(root.views.is_empty());
        assert_eq!(root.executor_count(), 1);
        assert_eq!(root.primary_view_name(), Some("all"));
    }

    #[test]
    fn test_root_executor_count_from_payload() {
        let root: RootInfo = serde_json::from_value(json!({"numExecutors": 4})).unwrap();
        assert_eq!(root.executor_count(), 4);
        assert_eq!(root.primary_view_name(), None);
    }

    #[test]
    fn test_job_summary_requires_name() {
        let result: Result<RootInfo, _> = serde_json::from_value(json!({"jobs": [{"url": "x"}]}));
        assert!(result.is_err());
    }
}
