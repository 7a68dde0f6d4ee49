//! Build queue domain types

use serde::{Deserialize, Serialize};

use super::Action;

/// Payload of `/queue/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueInfo {
    #[serde(default)]
    pub items: Vec<QueueItem>,
}

/// A pending request to run a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: u64,
    pub task: QueueTask,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub stuck: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTask {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_items() {
        let queue: QueueInfo = serde_json::from_value(json!({
            "items": [
                {
                    "id": 12,
                    "task": {"name": "deploy"},
                    "actions": [{"parameters": [{"name": "ENV", "value": "prod"}]}],
                    "why": "Waiting for next available executor"
                },
                {"id": 13, "task": {"name": "build"}}
            ]
        }))
        .unwrap();

        assert_eq!(queue.items.len(), 2);
        assert_eq!(queue.items[0].task.name, "deploy");
        assert_eq!(
            crate::domain::input_parameters(&queue.items[0].actions)["ENV"],
            Some(json!("prod"))
        );
        assert!(queue.items[1].actions.is_empty());
    }

    #[test]
    fn test_empty_queue() {
        let queue: QueueInfo = serde_json::from_value(json!({})).unwrap();
        assert!(queue.items.is_empty());
    }
}
