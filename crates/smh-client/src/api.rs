//! # ApiClient
//!
//! Thin typed wrapper over the `/api` routes. Every non-2xx response is
//! turned into [`ClientError::Api`] with the server's body attached, and
//! every failure is logged once here so callers only decide what to show.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use smh_core::draft::MaterialDraft;
use smh_core::filter::FilterOptions;
use smh_core::models::{Category, StudyMaterial};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::source::MaterialSource;

/// Where a development server listens by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Always ends with `/` so relative joins stay under it.
    base: Url,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| ClientError::Request(format!("{base_url}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Request(format!("{path}: {e}")))
    }

    /// Sends `request`; an error status becomes `ClientError::Api`.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                log::error!("{}: {err}", err.name());
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are JSON when they come from our handlers; anything
        // else (a proxy page, an empty body) still yields an error.
        let body = response.json().await.unwrap_or(serde_json::Value::Null);
        let err = ClientError::from_response(status.as_u16(), body);
        if let ClientError::Api { status, message, details, code, .. } = &err {
            log::error!("API error: status={status} message={message:?} details={details:?} code={code:?}");
        }
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response.json().await.map_err(|e| {
            log::error!("unreadable response from {}: {e}", e.url().map(Url::as_str).unwrap_or("?"));
            ClientError::Decode(e.to_string())
        })
    }

    /// Stored categories, for subject pickers.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let url = self.endpoint("categories")?;
        let response = self.send(self.http.get(url)).await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl MaterialSource for ApiClient {
    async fn fetch_materials(&self, filters: &FilterOptions) -> Result<Vec<StudyMaterial>> {
        let url = self.endpoint("materials")?;
        let response = self.send(self.http.get(url).query(filters)).await?;
        Self::read_json(response).await
    }

    async fn create_material(&self, draft: &MaterialDraft) -> Result<StudyMaterial> {
        let url = self.endpoint("materials")?;
        let response = self.send(self.http.post(url).json(draft)).await?;
        Self::read_json(response).await
    }

    async fn delete_material(&self, id: Uuid) -> Result<()> {
        let url = self.endpoint(&format!("materials/{id}"))?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/api/");
        assert_eq!(
            client.endpoint("materials").unwrap().as_str(),
            "http://localhost:3001/api/materials"
        );

        let client = ApiClient::new("http://localhost:3001/api/").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/api/");
    }

    #[test]
    fn test_unparsable_base_url_is_a_request_error() {
        let err = ApiClient::new("not a url").unwrap_err();
        assert_eq!(err.name(), "RequestError");
    }
}
