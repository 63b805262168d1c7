//! TFE HTTP client for API interactions

use log::debug;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::api;
use crate::error::{Result, TfeError};
use crate::hcp::pagination::{collect_pages, find_in_pages, Page};
use crate::hcp::traits::{ApiDocument, ApiListResponse, PaginatedResponse};

/// Options for building a [`TfeClient`]
#[derive(Clone, Default)]
pub struct ClientOptions {
    pub token: String,
    pub host: String,
    /// Full API base URL; defaults to `https://<host>/api/v2`
    pub base_url: Option<String>,
    /// Accept invalid TLS certificates
    pub ssl_skip_verify: bool,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("base_url", &self.base_url)
            .field("ssl_skip_verify", &self.ssl_skip_verify)
            .finish()
    }
}

/// TFE API client
pub struct TfeClient {
    client: Client,
    token: String,
    host: String,
    base_url: String,
}

/// JSON:API error document
#[derive(Deserialize, Debug)]
struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiErrorObject>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorObject {
    title: Option<String>,
    detail: Option<String>,
}

/// Default API base URL for a host
pub fn default_base_url(host: &str) -> String {
    format!("https://{}{}", host, api::BASE_PATH)
}

/// Build the pooled HTTP client shared by API calls and service discovery
pub(crate) fn build_http_client(ssl_skip_verify: bool) -> Result<Client> {
    let client = Client::builder()
        // Connection pool settings - reuse connections
        .pool_max_idle_per_host(20)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("terraform-provider-tfe/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(ssl_skip_verify)
        .build()?;
    Ok(client)
}

impl TfeClient {
    /// Create a new TFE client for `https://<host>/api/v2`
    pub fn new(token: String, host: String) -> Result<Self> {
        Self::with_options(ClientOptions {
            token,
            host,
            ..Default::default()
        })
    }

    /// Create a client from explicit options
    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let client = build_http_client(options.ssl_skip_verify)?;
        let base_url = options
            .base_url
            .unwrap_or_else(|| default_base_url(&options.host));

        Ok(Self {
            client,
            token: options.token,
            host: options.host,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client with custom base URL (mock servers, discovered endpoints)
    pub fn with_base_url(token: String, host: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            token,
            host,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL for API requests, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Hostname the client was configured for
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Add standard headers to a request builder
    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", api::CONTENT_TYPE)
    }

    /// Create a request builder for `path` with standard headers
    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.with_headers(self.client.request(method, url))
    }

    /// Build an API error from a failed response, keeping the server's detail
    async fn api_error(response: reqwest::Response, error_context: &str) -> TfeError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ApiErrors>(&body)
            .ok()
            .and_then(|e| e.errors.into_iter().next())
            .and_then(|e| e.detail.or(e.title));

        let message = match detail {
            Some(detail) => format!("Failed to {}: {}", error_context, detail),
            None => format!("Failed to {}", error_context),
        };
        TfeError::Api { status, message }
    }

    /// Parse an API response, returning error for non-success status codes
    async fn parse_api_response<T>(
        &self,
        response: reqwest::Response,
        error_context: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(Self::api_error(response, error_context).await);
        }
        Ok(response.json().await?)
    }

    /// Fetch a single resource by API path
    ///
    /// Returns `None` for 404 so handlers can drop vanished resources from state.
    ///
    /// # Arguments
    /// * `path` - API path (e.g., "/workspaces/ws-abc123")
    /// * `resource_label` - Human-readable label for error messages (e.g., "workspace 'ws-abc123'")
    pub async fn fetch_resource_by_path<T>(
        &self,
        path: &str,
        resource_label: &str,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        debug!("Fetching {} from: {}{}", resource_label, self.base_url, path);

        let response = self.request(Method::GET, path).send().await?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let doc: ApiDocument<T> = self
            .parse_api_response(response, &format!("fetch {}", resource_label))
            .await?;
        Ok(Some(doc.data))
    }

    /// POST or PATCH a JSON:API document and return the `data` member
    pub async fn send_document<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        resource_label: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {} ({})", method, path, resource_label);

        let action = if method == Method::POST {
            "create"
        } else {
            "update"
        };

        let response = self
            .request(method, path)
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        let doc: ApiDocument<T> = self
            .parse_api_response(response, &format!("{} {}", action, resource_label))
            .await?;
        Ok(doc.data)
    }

    /// DELETE a resource; a 404 counts as already deleted
    pub async fn delete_resource(&self, path: &str, resource_label: &str) -> Result<()> {
        debug!("Deleting {} at: {}{}", resource_label, self.base_url, path);

        let response = self.request(Method::DELETE, path).send().await?;

        match response.status().as_u16() {
            200..=299 => Ok(()),
            404 => {
                debug!("{} already gone", resource_label);
                Ok(())
            }
            _ => Err(Self::api_error(response, &format!("delete {}", resource_label)).await),
        }
    }

    /// Fetch one page of a listing
    ///
    /// `page` of `None` requests the first page without a page number.
    pub async fn fetch_page<T>(
        &self,
        path: &str,
        page: Option<u32>,
        error_context: &str,
    ) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        // Detect if path already has query params
        let separator = if path.contains('?') { "&" } else { "?" };

        let mut page_path = format!(
            "{}{}page[size]={}",
            path,
            separator,
            api::DEFAULT_PAGE_SIZE
        );
        if let Some(n) = page {
            page_path.push_str(&format!("&page[number]={}", n));
        }

        debug!("Fetching page {:?} from: {}{}", page, self.base_url, page_path);

        let response = self.request(Method::GET, &page_path).send().await?;

        let page_context = match page {
            Some(n) => format!("fetch {} (page {})", error_context, n),
            None => format!("fetch {}", error_context),
        };
        let resp: ApiListResponse<T> = self.parse_api_response(response, &page_context).await?;
        Ok(resp.into_page())
    }

    /// Walk a listing page by page until `predicate` matches
    pub async fn find_in_list<T, P>(
        &self,
        path: &str,
        predicate: P,
        resource: &str,
        key: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        P: FnMut(&T) -> bool,
    {
        let error_context = format!("{} list", resource);
        find_in_pages(
            |page| self.fetch_page::<T>(path, page, &error_context),
            predicate,
            resource,
            key,
        )
        .await
    }

    /// Fetch every page of a listing
    pub async fn list_all<T>(&self, path: &str, error_context: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        collect_pages(|page| self.fetch_page::<T>(path, page, error_context)).await
    }
}

#[cfg(test)]
impl TfeClient {
    /// Create a test client with mock base URL
    pub fn test_client(base_url: &str) -> Self {
        Self::with_base_url(
            "test-token".to_string(),
            "mock.terraform.io".to_string(),
            base_url.to_string(),
        )
    }
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Deserialize, Debug, Clone)]
    struct TestItem {
        id: String,
        name: String,
    }

    fn test_item_json(id: &str, name: &str) -> serde_json::Value {
        serde_json::json!({ "id": id, "name": name })
    }

    fn page_body(items: Vec<serde_json::Value>, current: u32, total: u32) -> serde_json::Value {
        let next = if current < total {
            serde_json::json!(current + 1)
        } else {
            serde_json::Value::Null
        };
        serde_json::json!({
            "data": items,
            "meta": {
                "pagination": {
                    "current-page": current,
                    "total-pages": total,
                    "next-page": next,
                    "total-count": total
                }
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_resource_sends_bearer_token() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/items/item-1"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": test_item_json("item-1", "Item 1")
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let item: Option<TestItem> = client
            .fetch_resource_by_path("/items/item-1", "item 'item-1'")
            .await
            .unwrap();
        assert_eq!(item.unwrap().name, "Item 1");
    }

    #[tokio::test]
    async fn test_fetch_resource_404_is_none() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/items/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let item: Option<TestItem> = client
            .fetch_resource_by_path("/items/missing", "item 'missing'")
            .await
            .unwrap();
        assert!(item.is_none());
    }

    #[tokio::test]
    async fn test_api_error_keeps_server_detail() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "errors": [{
                    "status": "422",
                    "title": "invalid attribute",
                    "detail": "Name has already been taken"
                }]
            })))
            .mount(&mock_server)
            .await;

        let result: Result<TestItem> = client
            .send_document(
                Method::POST,
                "/items",
                &serde_json::json!({"data": {}}),
                "item 'dup'",
            )
            .await;

        match result.unwrap_err() {
            TfeError::Api { status, message } => {
                assert_eq!(status, 422);
                assert!(message.contains("create item 'dup'"));
                assert!(message.contains("Name has already been taken"));
            }
            other => panic!("Expected TfeError::Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_document_patch_body() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        let body = serde_json::json!({"data": {"type": "items", "attributes": {"name": "new"}}});

        Mock::given(method("PATCH"))
            .and(path("/items/item-1"))
            .and(header("Content-Type", "application/vnd.api+json"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": test_item_json("item-1", "new")
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let item: TestItem = client
            .send_document(Method::PATCH, "/items/item-1", &body, "item 'item-1'")
            .await
            .unwrap();
        assert_eq!(item.id, "item-1");
        assert_eq!(item.name, "new");
    }

    #[tokio::test]
    async fn test_delete_resource_tolerates_404() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("DELETE"))
            .and(path("/items/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/items/locked"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&mock_server)
            .await;

        assert!(client.delete_resource("/items/gone", "item").await.is_ok());

        let err = client
            .delete_resource("/items/locked", "item 'locked'")
            .await
            .unwrap_err();
        assert!(matches!(err, TfeError::Api { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_find_in_list_walks_pages_sequentially() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        // Page 1 has no page[number] parameter
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page[size]", "100"))
            .and(wiremock::matchers::query_param_is_missing("page[number]"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-1", "one")], 1, 3)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page[number]", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-2", "two")], 2, 3)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page[number]", "3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-3", "three")], 3, 3)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let item: TestItem = client
            .find_in_list("/items", |i: &TestItem| i.name == "three", "item", "three")
            .await
            .unwrap();
        assert_eq!(item.id, "item-3");
    }

    #[tokio::test]
    async fn test_find_in_list_not_found_after_last_page() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(wiremock::matchers::query_param_is_missing("page[number]"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-1", "one")], 1, 2)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page[number]", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-2", "two")], 2, 2)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client
            .find_in_list("/items", |i: &TestItem| i.name == "nine", "item", "nine")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "item 'nine' not found");
    }

    #[tokio::test]
    async fn test_page_error_names_page() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(wiremock::matchers::query_param_is_missing("page[number]"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-1", "one")], 1, 2)),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page[number]", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result: Result<Vec<TestItem>> = client.list_all("/items", "items").await;
        match result.unwrap_err() {
            TfeError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("page 2"));
            }
            other => panic!("Expected TfeError::Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_all_with_existing_query_params() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("search[name]", "test"))
            .and(query_param("page[size]", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(vec![test_item_json("item-1", "test-a")], 1, 1)),
            )
            .mount(&mock_server)
            .await;

        let items: Vec<TestItem> = client
            .list_all("/items?search[name]=test", "items")
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "test-a");
    }
}
