use crate::error::{CarrierOperation, ConfigurationError, ProviderError, ProviderErrorKind};
use omniship_shared::{Masked, ProviderKind};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Carrier authentication: an optional bearer token plus fixed extra headers
#[derive(Debug, Clone, Default)]
pub struct CarrierAuth {
    bearer: Option<Masked<String>>,
    headers: Vec<(&'static str, Masked<String>)>,
}

impl CarrierAuth {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(Masked::new(token.into())),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, Masked::new(value.into())));
        self
    }
}

/// Authenticated JSON client bound to one carrier.
///
/// Endpoints are given as path segments; each segment is percent-encoded, so
/// caller ids containing `/`, `?` or `#` stay inside their own segment.
/// Every non-2xx response or transport failure comes back as a
/// [`ProviderError`] tagged with the carrier and the operation.
#[derive(Debug, Clone)]
pub struct CarrierHttp {
    provider: ProviderKind,
    base_url: Url,
    client: Client,
    auth: CarrierAuth,
}

impl CarrierHttp {
    pub fn new(
        provider: ProviderKind,
        base_url: impl Into<String>,
        auth: CarrierAuth,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        let raw = base_url.into();
        let base_url = Url::parse(&raw)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigurationError::InvalidBaseUrl { provider, url: raw.clone() })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigurationError::HttpClient {
            provider,
            reason: e.to_string(),
        })?;

        Ok(Self {
            provider,
            base_url,
            client,
            auth,
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL with `segments` appended, each encoded as a single segment
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Infallible: cannot-be-a-base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(&self, operation: CarrierOperation, path: &[&str]) -> Result<T, ProviderError> {
        self.execute(operation, self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        operation: CarrierOperation,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        self.execute(operation, self.request(Method::GET, path).query(query))
            .await
    }

    pub async fn post<B, T>(&self, operation: CarrierOperation, path: &[&str], body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(operation, self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, operation: CarrierOperation, path: &[&str]) -> Result<T, ProviderError> {
        self.execute(operation, self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &[&str]) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.endpoint(path))
            .header(ACCEPT, "application/json");

        if let Some(token) = &self.auth.bearer {
            request = request.bearer_auth(token.expose());
        }
        for (name, value) in &self.auth.headers {
            request = request.header(*name, value.expose().as_str());
        }
        request
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: CarrierOperation,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.fail(operation, ProviderErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.fail(operation, ProviderErrorKind::Transport(e.to_string())))?;

        if !status.is_success() {
            tracing::debug!(
                provider = %self.provider,
                %operation,
                status = status.as_u16(),
                "Carrier rejected request"
            );
            return Err(self.fail(
                operation,
                ProviderErrorKind::Http {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        // DELETE and cancel endpoints may answer 204 with no body
        let parsed = if body.trim().is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_str(&body)
        };
        parsed.map_err(|e| self.fail(operation, ProviderErrorKind::Malformed(e.to_string())))
    }

    fn fail(&self, operation: CarrierOperation, kind: ProviderErrorKind) -> ProviderError {
        ProviderError::new(self.provider, operation, kind)
    }
}
