use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use url::Url;

use crate::errors::CoreError;
use crate::models::subscription::{Subscription, SubscriptionFields, SubscriptionPatch};

use super::traits::SubscriptionStore;

const STORE_NAME: &str = "remote";

/// Environment variable holding the document-store base URL.
pub const ENV_URL: &str = "SUBSCRIPTION_STORE_URL";
/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "SUBSCRIPTION_STORE_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "SUBSCRIPTION_STORE_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`RemoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl RemoteStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Read the config from `SUBSCRIPTION_STORE_URL`, `SUBSCRIPTION_STORE_TOKEN`
    /// and `SUBSCRIPTION_STORE_TIMEOUT_SECS`. Only the URL is required.
    pub fn from_env() -> Result<Self, CoreError> {
        let base_url = std::env::var(ENV_URL)
            .map_err(|_| CoreError::Validation(format!("{ENV_URL} is not set")))?;
        let mut config = Self::new(base_url);
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            if !token.is_empty() {
                config.auth_token = Some(token);
            }
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Validation(format!("{ENV_TIMEOUT} must be a whole number, got '{raw}'"))
            })?;
        }
        Ok(config)
    }
}

// ── Document-store wire types ───────────────────────────────────────

#[derive(Deserialize)]
struct ListResponse {
    subscriptions: Vec<Subscription>,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: String,
}

#[derive(Serialize)]
struct ImportRequest<'a> {
    records: &'a [SubscriptionFields],
}

#[derive(Deserialize)]
struct ImportResponse {
    count: usize,
}

/// Client for a REST document store holding one collection per user at
/// `{base}/users/{owner}/subscriptions`.
///
/// - `GET    …/subscriptions`          → `{"subscriptions": [...]}`
/// - `POST   …/subscriptions`          → `{"id": "..."}`
/// - `PATCH  …/subscriptions/{id}`
/// - `DELETE …/subscriptions/{id}`
/// - `POST   …/subscriptions:import`   → `{"count": n}`
/// - `DELETE …/subscriptions`
pub struct RemoteStore {
    client: Client,
    base: Url,
    auth_token: Option<String>,
}

impl RemoteStore {
    pub fn new(config: RemoteStoreConfig) -> Result<Self, CoreError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            CoreError::Validation(format!("invalid store url '{}': {e}", config.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(CoreError::Validation(format!(
                "store url '{}' cannot hold paths",
                config.base_url
            )));
        }

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        Ok(Self {
            client: builder.build()?,
            base,
            auth_token: config.auth_token,
        })
    }

    /// URL of `owner_id`'s collection. Path segments are percent-encoded.
    pub fn collection_url(&self, owner_id: &str) -> Url {
        self.url_with(&["users", owner_id, "subscriptions"])
    }

    /// URL of one subscription document.
    pub fn document_url(&self, owner_id: &str, id: &str) -> Url {
        self.url_with(&["users", owner_id, "subscriptions", id])
    }

    fn import_url(&self, owner_id: &str) -> Url {
        self.url_with(&["users", owner_id, "subscriptions:import"])
    }

    fn url_with(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turn a non-2xx reply into a store error; 404 on a document means the
/// subscription does not exist.
async fn check(response: Response, missing_id: Option<&str>) -> Result<Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = missing_id {
            return Err(CoreError::SubscriptionNotFound(id.to_string()));
        }
    }
    let body = response.text().await.unwrap_or_default();
    Err(CoreError::Persistence {
        store: STORE_NAME.to_string(),
        message: format!("HTTP {status}: {}", body.trim()),
    })
}

fn bad_body(what: &str, e: reqwest::Error) -> CoreError {
    CoreError::Persistence {
        store: STORE_NAME.to_string(),
        message: format!("unexpected {what} response: {e}"),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SubscriptionStore for RemoteStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Subscription>, CoreError> {
        let response = self
            .request(Method::GET, self.collection_url(owner_id))
            .send()
            .await?;
        let body: ListResponse = check(response, None)
            .await?
            .json()
            .await
            .map_err(|e| bad_body("list", e))?;
        log::debug!("listed {} subscriptions for {owner_id}", body.subscriptions.len());
        Ok(body.subscriptions)
    }

    async fn create(&self, owner_id: &str, fields: SubscriptionFields) -> Result<String, CoreError> {
        let response = self
            .request(Method::POST, self.collection_url(owner_id))
            .json(&fields)
            .send()
            .await?;
        let body: CreateResponse = check(response, None)
            .await?
            .json()
            .await
            .map_err(|e| bad_body("create", e))?;
        log::info!("created subscription {} for {owner_id}", body.id);
        Ok(body.id)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &SubscriptionPatch,
    ) -> Result<(), CoreError> {
        let response = self
            .request(Method::PATCH, self.document_url(owner_id, id))
            .json(patch)
            .send()
            .await?;
        check(response, Some(id)).await?;
        log::info!("updated subscription {id} for {owner_id}");
        Ok(())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), CoreError> {
        let response = self
            .request(Method::DELETE, self.document_url(owner_id, id))
            .send()
            .await?;
        check(response, Some(id)).await?;
        log::info!("deleted subscription {id} for {owner_id}");
        Ok(())
    }

    async fn bulk_import(
        &self,
        owner_id: &str,
        records: Vec<SubscriptionFields>,
    ) -> Result<usize, CoreError> {
        let response = self
            .request(Method::POST, self.import_url(owner_id))
            .json(&ImportRequest { records: &records })
            .send()
            .await?;
        let body: ImportResponse = check(response, None)
            .await?
            .json()
            .await
            .map_err(|e| bad_body("import", e))?;
        log::info!("imported {} subscriptions for {owner_id}", body.count);
        Ok(body.count)
    }

    async fn clear_all(&self, owner_id: &str) -> Result<(), CoreError> {
        let response = self
            .request(Method::DELETE, self.collection_url(owner_id))
            .send()
            .await?;
        check(response, None).await?;
        log::info!("cleared subscriptions for {owner_id}");
        Ok(())
    }
}
