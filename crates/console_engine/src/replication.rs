use reqwest::Method;

use crate::client::{total_count, ReqwestRegistryClient};
use crate::models::{Execution, Task, TaskPage, TaskQuery};
use crate::ApiError;

const EXECUTIONS_ENDPOINT: &str = "/api/replication/executions";

#[async_trait::async_trait]
pub trait ReplicationService: Send + Sync {
    async fn get_execution(&self, execution_id: i64) -> Result<Execution, ApiError>;

    async fn list_tasks(
        &self,
        execution_id: i64,
        query: &TaskQuery,
    ) -> Result<TaskPage, ApiError>;

    async fn stop_execution(&self, execution_id: i64) -> Result<(), ApiError>;

    /// Link to the raw log of one task.
    fn task_log_url(&self, execution_id: i64, task_id: i64) -> String;
}

#[async_trait::async_trait]
impl ReplicationService for ReqwestRegistryClient {
    async fn get_execution(&self, execution_id: i64) -> Result<Execution, ApiError> {
        let url = self.endpoint(&format!("{EXECUTIONS_ENDPOINT}/{execution_id}"))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::read_json(response).await
    }

    async fn list_tasks(
        &self,
        execution_id: i64,
        query: &TaskQuery,
    ) -> Result<TaskPage, ApiError> {
        let mut url = self.endpoint(&format!("{EXECUTIONS_ENDPOINT}/{execution_id}/tasks"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("page_size", &query.page_size.to_string());
            if let Some((field, value)) = &query.filter {
                pairs.append_pair(field, value);
            }
        }
        let response = self.send(self.request(Method::GET, url)).await?;
        let header_total = total_count(&response);
        let tasks: Option<Vec<Task>> = Self::read_json(response).await?;
        Ok(TaskPage {
            tasks: tasks.unwrap_or_default(),
            total_count: header_total,
        })
    }

    async fn stop_execution(&self, execution_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{EXECUTIONS_ENDPOINT}/{execution_id}"))?;
        let body = serde_json::json!({});
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }

    fn task_log_url(&self, execution_id: i64, task_id: i64) -> String {
        format!(
            "{}{EXECUTIONS_ENDPOINT}/{execution_id}/tasks/{task_id}/log",
            self.base_url()
        )
    }
}
