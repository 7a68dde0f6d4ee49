//! Crumb (anti-CSRF token) handling
//!
//! Crumbs go `Disabled -> Fetching -> Enabled`, or back to `Disabled` when the
//! fetch fails or the issuer answers with an incomplete crumb. While enabled,
//! every request built by the client carries the crumb header.

use jenkins_core::dto::crumb::CrumbResponse;
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Method};
use crate::{JenkinsClient, decode_json, lock};

pub(crate) const CRUMB_PATH: &str = "/crumbIssuer/api/json";

#[derive(Debug, Default)]
pub(crate) struct CrumbState {
    enabled: bool,
    value: Option<String>,
    header_name: Option<String>,
}

impl CrumbState {
    /// Header to attach, if crumbs are enabled and complete
    fn header(&self) -> Option<(String, String)> {
        if !self.enabled {
            return None;
        }
        match (&self.header_name, &self.value) {
            (Some(name), Some(value)) => Some((name.clone(), value.clone())),
            _ => None,
        }
    }
}

impl JenkinsClient {
    /// Turn crumbs on and fetch one from the crumb issuer
    ///
    /// The bootstrap request never carries a crumb itself. If the fetch fails or
    /// the crumb is incomplete, crumbs end up disabled and the error is returned.
    pub fn enable_crumbs(&self) -> Result<()> {
        let _flight = lock(&self.inner.crumb_flight);
        lock(&self.inner.crumb).enabled = true;

        let request = ApiRequest::new(CRUMB_PATH, self.inner.credentials.clone());
        let fetched = self.execute(Method::Get, &request, decode_json::<CrumbResponse>);

        let mut state = lock(&self.inner.crumb);
        match fetched {
            Ok(response) => {
                let complete = response.header().is_some();
                state.value = response.crumb;
                state.header_name = response.crumb_request_field;
                state.enabled = complete;

                if complete {
                    info!(header = ?state.header_name, "crumbs enabled");
                    Ok(())
                } else {
                    warn!("crumb issuer returned an incomplete crumb, crumbs disabled");
                    Err(ClientError::CrumbFetch {
                        path: CRUMB_PATH.to_string(),
                        reason: "crumb or crumbRequestField missing".to_string(),
                        source: None,
                    })
                }
            }
            Err(error) => {
                state.enabled = false;
                warn!(error = %error, "crumb fetch failed, crumbs disabled");
                Err(ClientError::CrumbFetch {
                    path: CRUMB_PATH.to_string(),
                    reason: error.to_string(),
                    source: Some(Box::new(error)),
                })
            }
        }
    }

    /// Stop sending crumbs; no request is made
    pub fn disable_crumbs(&self) {
        lock(&self.inner.crumb).enabled = false;
        info!("crumbs disabled");
    }

    pub fn are_crumbs_enabled(&self) -> bool {
        lock(&self.inner.crumb).enabled
    }

    pub(crate) fn crumb_header(&self) -> Option<(String, String)> {
        lock(&self.inner.crumb).header()
    }
}
