//! Native HTTP client using reqwest

use super::{HttpError, HttpResponse};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "imbook/0.1";

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::RequestFailed {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(HttpError::RateLimited);
        }

        let body = response.text().await.map_err(|e| HttpError::ParseError {
            message: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }

    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let url = url::Url::parse_with_params(url, params).map_err(|_| HttpError::InvalidUrl {
            url: url.to_string(),
        })?;

        self.get(url.as_str()).await
    }

    /// GET and require a 2xx status, returning the body
    pub async fn get_ok_body(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let response = self.get_with_params(url, params).await?;
        if !response.is_success() {
            return Err(HttpError::Status {
                status: response.status,
            });
        }
        Ok(response.body)
    }
}
