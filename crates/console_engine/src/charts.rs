use reqwest::Method;

use crate::client::ReqwestRegistryClient;
use crate::models::ChartVersion;
use crate::ApiError;

fn chart_path(project: &str, chart: &str) -> String {
    format!("/api/chartrepo/{project}/charts/{chart}")
}

#[async_trait::async_trait]
pub trait ChartRepository: Send + Sync {
    /// Every version of `chart` in the chart repository of `project`.
    async fn list_chart_versions(
        &self,
        project: &str,
        chart: &str,
    ) -> Result<Vec<ChartVersion>, ApiError>;
}

#[async_trait::async_trait]
impl ChartRepository for ReqwestRegistryClient {
    async fn list_chart_versions(
        &self,
        project: &str,
        chart: &str,
    ) -> Result<Vec<ChartVersion>, ApiError> {
        let url = self.endpoint(&chart_path(project, chart))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let versions: Option<Vec<ChartVersion>> = Self::read_json(response).await?;
        Ok(versions.unwrap_or_default())
    }
}
