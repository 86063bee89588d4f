use crate::domain::{BuildRequest, RequestTemplate};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;

const API_VERSION_HEADER: &str = "Travis-API-Version";
const API_VERSION: &str = "3";

/// Represents errors that can occur when asking Travis for a build.
#[derive(Debug, Error)]
pub enum TriggerRequestError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to trigger {target}: {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to trigger {target}. Status: {status}. Error: {body}")]
    Rejected {
        target: String,
        status: StatusCode,
        body: String,
    },
}

/// Client for the Travis CI v3 "create request" endpoint.
#[derive(Debug)]
pub struct TravisClient {
    http_client: Client,
    base_url: String,
    api_token: SecretString,
}

impl TravisClient {
    pub fn new(
        base_url: impl Into<String>,
        api_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, TriggerRequestError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TriggerRequestError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
            api_token,
        })
    }

    /// `POST {base_url}/repo/{owner}%2F{repo}/requests`
    pub fn requests_url(&self, request: &BuildRequest) -> String {
        format!(
            "{}/repo/{}%2F{}/requests",
            self.base_url,
            request.owner(),
            request.repo()
        )
    }

    /// Asks Travis to build `request.branch()` of the downstream repository.
    ///
    /// Any 2xx response counts as accepted; Travis answers `202 Accepted`
    /// and queues the build asynchronously.
    pub async fn trigger_build(
        &self,
        request: &BuildRequest,
        template: &RequestTemplate,
    ) -> Result<(), TriggerRequestError> {
        let target = format!("{}@{}", request.slug(), request.branch());

        let response = self
            .http_client
            .post(self.requests_url(request))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(API_VERSION_HEADER, API_VERSION)
            .header(
                AUTHORIZATION,
                format!("token {}", self.api_token.expose_secret()),
            )
            .json(&request.payload(template))
            .send()
            .await
            .map_err(|source| TriggerRequestError::Transport {
                target: target.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriggerRequestError::Rejected {
                target,
                status,
                body,
            });
        }

        Ok(())
    }
}
