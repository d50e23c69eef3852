use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::{extract_detail, ApiError};
use crate::store::CredentialSource;

/// Single choke point for every backend call.
///
/// Requests are built through [`Gateway::request`], which runs them through
/// [`authorize`]; callers never attach the credential themselves.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl Gateway {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request to `path`, already carrying the session credential
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}", method, path);
        authorize(self.client.request(method, self.url(path)), self.credentials.as_ref())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(self.request(Method::GET, path)).await
    }

    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    /// Send `builder` and decode a successful JSON body.
    /// Non-success statuses become [`ApiError::Status`]; nothing is retried.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            debug!("backend answered {}", status);
            return Err(ApiError::Status {
                status,
                detail: extract_detail(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Request stage that attaches `Authorization: Bearer <credential>` when a
/// credential is stored. Without one the request goes out unauthenticated.
pub fn authorize(builder: RequestBuilder, credentials: &dyn CredentialSource) -> RequestBuilder {
    match credentials.get() {
        Some(credential) => builder.header(AUTHORIZATION, credential.bearer()),
        None => builder,
    }
}
