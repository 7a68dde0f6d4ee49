//! View domain types

use serde::{Deserialize, Serialize};

use super::root::JobSummary;

/// Payload of `/view/{name}/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

impl ViewInfo {
    /// Worst ball color among the view's jobs, starting from `blue`.
    ///
    /// Colors outside the table rank 999 and therefore win over everything.
    /// Jobs without a color do not take part.
    pub fn color(&self) -> String {
        let mut color = "blue";
        for job in &self.jobs {
            let Some(candidate) = job.color.as_deref() else {
                continue;
            };
            if color_priority(candidate) > color_priority(color) {
                color = candidate;
            }
        }
        color.to_string()
    }
}

/// Fixed ranking of Jenkins ball colors
pub fn color_priority(color: &str) -> u16 {
    match color {
        "red_anime" => 11,
        "red" => 10,
        "yellow_anime" => 6,
        "yellow" => 5,
        "blue_anime" => 2,
        "blue" => 1,
        "disabled" => 0,
        _ => 999,
    }
}
