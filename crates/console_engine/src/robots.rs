use reqwest::Method;

use crate::client::ReqwestRegistryClient;
use crate::models::{NewRobot, Robot, RobotToken};
use crate::ApiError;

fn robots_path(project_id: i64) -> String {
    format!("/api/projects/{project_id}/robots")
}

fn robot_path(project_id: i64, robot_id: i64) -> String {
    format!("/api/projects/{project_id}/robots/{robot_id}")
}

/// Robot accounts of one project.
#[async_trait::async_trait]
pub trait RobotRepository: Send + Sync {
    async fn create_robot(&self, project_id: i64, robot: &NewRobot)
        -> Result<RobotToken, ApiError>;
    async fn delete_robot(&self, project_id: i64, robot_id: i64) -> Result<(), ApiError>;
    async fn list_robots(&self, project_id: i64) -> Result<Vec<Robot>, ApiError>;
    async fn get_robot(&self, project_id: i64, robot_id: i64) -> Result<Robot, ApiError>;
    async fn toggle_disabled(
        &self,
        project_id: i64,
        robot_id: i64,
        disabled: bool,
    ) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl RobotRepository for ReqwestRegistryClient {
    async fn create_robot(
        &self,
        project_id: i64,
        robot: &NewRobot,
    ) -> Result<RobotToken, ApiError> {
        let url = self.endpoint(&robots_path(project_id))?;
        let response = self.send(self.request(Method::POST, url).json(robot)).await?;
        Self::read_json(response).await
    }

    async fn delete_robot(&self, project_id: i64, robot_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&robot_path(project_id, robot_id))?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn list_robots(&self, project_id: i64) -> Result<Vec<Robot>, ApiError> {
        let url = self.endpoint(&robots_path(project_id))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let robots: Option<Vec<Robot>> = Self::read_json(response).await?;
        Ok(robots.unwrap_or_default())
    }

    async fn get_robot(&self, project_id: i64, robot_id: i64) -> Result<Robot, ApiError> {
        let url = self.endpoint(&robot_path(project_id, robot_id))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::read_json(response).await
    }

    async fn toggle_disabled(
        &self,
        project_id: i64,
        robot_id: i64,
        disabled: bool,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&robot_path(project_id, robot_id))?;
        let body = serde_json::json!({ "disabled": disabled });
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }
}
