use reqwest::Method;

use crate::client::ReqwestRegistryClient;
use crate::models::Project;
use crate::ApiError;

const PROJECTS_ENDPOINT: &str = "/api/projects";

#[async_trait::async_trait]
pub trait ProjectService: Send + Sync {
    /// Projects whose name contains `name`; the server answers `null` for none.
    async fn list_projects(&self, name: &str) -> Result<Vec<Project>, ApiError>;
}

#[async_trait::async_trait]
impl ProjectService for ReqwestRegistryClient {
    async fn list_projects(&self, name: &str) -> Result<Vec<Project>, ApiError> {
        let mut url = self.endpoint(PROJECTS_ENDPOINT)?;
        url.query_pairs_mut().append_pair("name", name);
        let response = self.send(self.request(Method::GET, url)).await?;
        let projects: Option<Vec<Project>> = Self::read_json(response).await?;
        Ok(projects.unwrap_or_default())
    }
}
