//! Crumb issuer DTOs

use serde::{Deserialize, Serialize};

/// Response of `/crumbIssuer/api/json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrumbResponse {
    #[serde(default)]
    pub crumb: Option<String>,
    #[serde(default)]
    pub crumb_request_field: Option<String>,
}

impl CrumbResponse {
    /// Header name and value, when both are present and non-empty
    pub fn header(&self) -> Option<(&str, &str)> {
        let field = self.crumb_request_field.as_deref().filter(|f| !f.is_empty())?;
        let crumb = self.crumb.as_deref().filter(|c| !c.is_empty())?;
        Some((field, crumb))
    }
}
