//! View endpoints

use jenkins_core::domain::view::ViewInfo;
use urlencoding::encode;

use crate::JenkinsClient;
use crate::components::View;
use crate::error::Result;

impl JenkinsClient {
    /// Every view listed in the root snapshot
    pub fn get_views(&self) -> Result<Vec<View>> {
        let root = self.root()?;
        root.views
            .iter()
            .map(|view| self.get_view(&view.name))
            .collect()
    }

    /// The primary view, when the server designates one
    pub fn get_primary_view(&self) -> Result<Option<View>> {
        let root = self.root()?;
        root.primary_view_name()
            .map(|name| self.get_view(name))
            .transpose()
    }

    pub fn get_view(&self, name: &str) -> Result<View> {
        let info: ViewInfo = self.get_json(format!("/view/{}/api/json", encode(name)))?;
        Ok(View::new(info, self.clone()))
    }
}
