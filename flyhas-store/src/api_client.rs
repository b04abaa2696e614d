use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("Cannot build a request URL from {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin JSON client for the collaborator REST API.
///
/// One attempt per call; retries are left to the user.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Base URL extended by `segments`, each percent-encoded as exactly one
    /// path segment.
    pub fn segment_url(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let invalid = |reason: String| ApiClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET on a path built from untrusted segments.
    pub async fn get_json_at<T>(&self, segments: &[&str]) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.segment_url(segments)?;
        debug!("GET {}", url);
        let request = self.http.get(url.clone());
        Self::send(url.to_string(), request).await
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("GET {}", url);
        let request = self.http.get(&url);
        Self::send(url, request).await
    }

    pub async fn get_json_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("GET {}", url);
        let request = self.http.get(&url).query(query);
        Self::send(url, request).await
    }

    async fn send<T: DeserializeOwned>(
        url: String,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ApiClientError::Transport { url: url.clone(), source })?;

        Self::decode(url, response).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let request = self.http.post(&url).json(body);
        Self::send(url, request).await
    }

    /// POST whose response body is irrelevant beyond its status.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiClientError::Transport { url: url.clone(), source })?;

        Self::check_status(url, response).await.map(|_| ())
    }

    async fn check_status(
        url: String,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("{} answered {}", url, status);
        Err(ApiClientError::Status { url, status, body })
    }

    async fn decode<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let response = Self::check_status(url.clone(), response).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ApiClientError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/flights/3"), "http://localhost:8080/api/flights/3");
        assert_eq!(client.url("cities"), "http://localhost:8080/api/cities");
    }

    #[test]
    fn test_segment_url_keeps_ids_inside_one_segment() {
        let client = ApiClient::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();

        let url = client.segment_url(&["flights", "42"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/flights/42");

        let url = client.segment_url(&["flights", "1/../../admin?x=1#y"]).unwrap();
        assert_eq!(url.path(), "/api/flights/1%2F..%2F..%2Fadmin%3Fx=1%23y");
        assert_eq!(url.query(), None);
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }
}
