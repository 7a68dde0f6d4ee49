//! Job domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Action, BuildRef};

/// Payload of `/job/{name}/api/json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Ball color; folders and other non-buildable items have none
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub buildable: Option<bool>,
    #[serde(default)]
    pub builds: Vec<BuildRef>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub last_build: Option<BuildRef>,
    #[serde(default)]
    pub last_successful_build: Option<BuildRef>,
}

impl JobInfo {
    /// Parameter definitions declared on the job, keyed by parameter name
    pub fn parameters_definition(&self) -> BTreeMap<String, ParameterSpec> {
        self.actions
            .iter()
            .filter_map(|action| action.parameter_definitions.as_ref())
            .flatten()
            .map(|definition| {
                (
                    definition.name.clone(),
                    ParameterSpec {
                        default: definition
                            .default_parameter_value
                            .as_ref()
                            .and_then(|default| default.value.clone()),
                        choices: definition.choices.clone(),
                        description: definition.description.clone(),
                    },
                )
            })
            .collect()
    }
}

/// A parameter definition from a job's `actions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_parameter_value: Option<DefaultParameterValue>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultParameterValue {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Flattened view of one parameter definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub default: Option<serde_json::Value>,
    pub choices: Option<Vec<String>>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_decodes_nullable_build_refs() {
        let job: JobInfo = serde_json::from_value(json!({
            "name": "foo",
            "color": "blue",
            "builds": [{"number": 1}],
            "actions": [],
            "lastBuild": {"number": 1},
            "lastSuccessfulBuild": null
        }))
        .unwrap();

        assert_eq!(job.name, "foo");
        assert_eq!(job.color.as_deref(), Some("blue"));
        assert_eq!(job.builds.len(), 1);
        assert_eq!(job.last_build.map(|build| build.number), Some(1));
        assert!(job.last_successful_build.is_none());
    }

    #[test]
    fn test_job_requires_name() {
        let result: Result<JobInfo, _> = serde_json::from_value(json!({"color": "blue"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_parameters_definition() {
        let job: JobInfo = serde_json::from_value(json!({
            "name": "deploy",
            "actions": [
                {},
                {"parameterDefinitions": [
                    {
                        "name": "ENV",
                        "type": "ChoiceParameterDefinition",
                        "description": "target",
                        "defaultParameterValue": {"name": "ENV", "value": "staging"},
                        "choices": ["staging", "prod"]
                    },
                    {"name": "FORCE", "defaultParameterValue": {"value": false}}
                ]}
            ]
        }))
        .unwrap();

        let parameters = job.parameters_definition();
        assert_eq!(parameters.len(), 2);

        let env = &parameters["ENV"];
        assert_eq!(env.default, Some(json!("staging")));
        assert_eq!(
            env.choices.as_deref(),
            Some(&["staging".to_string(), "prod".to_string()][..])
        );
        assert_eq!(env.description.as_deref(), Some("target"));

        let force = &parameters["FORCE"];
        assert_eq!(force.default, Some(json!(false)));
        assert!(force.choices.is_none());
    }
}
