//! Core domain types
//!
//! Each record mirrors one Jenkins API endpoint. Required fields fail the decode
//! when absent; optional ones default. Projections that need further round trips
//! live in the client crate and wrap these records.

pub mod build;
pub mod computer;
pub mod job;
pub mod queue;
pub mod root;
pub mod test_report;
pub mod view;

use serde::{Deserialize, Serialize};

/// Reference to a build inside another payload (`{"number": 12, "url": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRef {
    pub number: u64,
    #[serde(default)]
    pub url: Option<String>,
}

/// One entry of a payload's `actions` array
///
/// Jenkins mixes unrelated action classes in the same array, so every field is
/// optional and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default)]
    pub parameters: Option<Vec<ParameterValue>>,
    #[serde(default)]
    pub parameter_definitions: Option<Vec<job::ParameterDefinition>>,
}

/// A parameter value a build or queue item was started with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Collect the input parameters carried by the first action that has any.
pub fn input_parameters(
    actions: &[Action],
) -> std::collections::BTreeMap<String, Option<serde_json::Value>> {
    actions
        .iter()
        .find_map(|action| action.parameters.as_ref())
        .map(|parameters| {
            parameters
                .iter()
                .map(|parameter| (parameter.name.clone(), parameter.value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
