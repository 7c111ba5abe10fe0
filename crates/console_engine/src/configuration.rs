use reqwest::Method;
use serde_json::Value;

use crate::client::ReqwestRegistryClient;
use crate::models::Configuration;
use crate::ApiError;

const CONFIG_ENDPOINT: &str = "/api/configurations";
const EMAIL_PING_ENDPOINT: &str = "/api/email/ping";
const LDAP_PING_ENDPOINT: &str = "/api/ldap/ping";
const OIDC_PING_ENDPOINT: &str = "/api/system/oidc/ping";

#[async_trait::async_trait]
pub trait ConfigurationService: Send + Sync {
    async fn get_configuration(&self) -> Result<Configuration, ApiError>;
    async fn save_configuration(&self, values: &Configuration) -> Result<(), ApiError>;
    async fn test_mail_server(&self, settings: &Value) -> Result<(), ApiError>;
    async fn test_ldap_server(&self, settings: &Value) -> Result<(), ApiError>;
    async fn test_oidc_server(&self, settings: &Value) -> Result<(), ApiError>;
}

impl ReqwestRegistryClient {
    async fn post_ping(&self, path: &str, settings: &Value) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.request(Method::POST, url).json(settings))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConfigurationService for ReqwestRegistryClient {
    async fn get_configuration(&self) -> Result<Configuration, ApiError> {
        let url = self.endpoint(CONFIG_ENDPOINT)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::read_json(response).await
    }

    async fn save_configuration(&self, values: &Configuration) -> Result<(), ApiError> {
        let url = self.endpoint(CONFIG_ENDPOINT)?;
        self.send(self.request(Method::PUT, url).json(values)).await?;
        Ok(())
    }

    async fn test_mail_server(&self, settings: &Value) -> Result<(), ApiError> {
        self.post_ping(EMAIL_PING_ENDPOINT, settings).await
    }

    async fn test_ldap_server(&self, settings: &Value) -> Result<(), ApiError> {
        self.post_ping(LDAP_PING_ENDPOINT, settings).await
    }

    async fn test_oidc_server(&self, settings: &Value) -> Result<(), ApiError> {
        self.post_ping(OIDC_PING_ENDPOINT, settings).await
    }
}
