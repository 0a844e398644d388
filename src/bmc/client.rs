//! Bare Metal Cloud session client
//!
//! One immutable client per configured session. Construction resolves
//! everything up front: credentials are parsed, endpoints are rendered
//! and validated, and the transport is built, so a client that exists can
//! sign and send. The client is `Send + Sync`; hosts share it across
//! concurrent resource operations behind an `Arc`.

use std::collections::HashMap;
use std::fmt;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::auth::{CredentialBundle, RequestSigner};
use super::http::{parse_error_body, sanitize_for_log, with_query, TransportConfig};
use crate::config::DEFAULT_REGION;
use crate::error::{ApiError, ProviderError, Result};
use crate::retry::{retry_transient, RetryPolicy, RetrySchedule};

/// Endpoint template used when the environment does not override it.
pub const DEFAULT_URL_TEMPLATE: &str = "https://{service}.{region}.oraclecloud.com";

/// The API services the provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Core,
    Database,
    Identity,
    LoadBalancer,
    ObjectStorage,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Core,
        Service::Database,
        Service::Identity,
        Service::LoadBalancer,
        Service::ObjectStorage,
    ];

    /// Hostname label substituted for `{service}` in the URL template.
    /// Core networking/compute and load balancing share the `iaas` host.
    pub fn host_label(self) -> &'static str {
        match self {
            Service::Core | Service::LoadBalancer => "iaas",
            Service::Database => "database",
            Service::Identity => "identity",
            Service::ObjectStorage => "objectstorage",
        }
    }

    /// API version path segment for this service.
    pub fn api_version(self) -> &'static str {
        match self {
            Service::LoadBalancer => "20170115",
            _ => "20160918",
        }
    }
}

/// Substitute `{service}` and `{region}` into an endpoint template.
///
/// A template without placeholders pins every service to one host, which
/// is how test rigs route all traffic to a local server.
fn render_endpoint(template: &str, service: Service, region: &str) -> String {
    template
        .replace("{service}", service.host_label())
        .replace("{region}", region)
}

/// Render and validate the endpoint for every service.
fn build_endpoints(template: &str, region: &str) -> Result<HashMap<Service, Url>> {
    let mut endpoints = HashMap::new();
    for service in Service::ALL {
        let rendered = render_endpoint(template, service, region);
        let url = Url::parse(&rendered).map_err(|e| {
            ProviderError::client_construction(format!(
                "Endpoint {:?} rendered from url_template is not a valid URL: {}",
                rendered, e
            ))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ProviderError::client_construction(format!(
                "Endpoint {} has unsupported scheme {:?}",
                url,
                url.scheme()
            )));
        }
        endpoints.insert(service, url);
    }
    Ok(endpoints)
}

/// Builder for [`BmcClient`].
#[derive(Default)]
pub struct ClientBuilder {
    bundle: Option<CredentialBundle>,
    transport: TransportConfig,
    region: Option<String>,
    disable_auto_retries: bool,
    url_template: Option<String>,
    schedule: RetrySchedule,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(mut self, bundle: CredentialBundle) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn disable_auto_retries(mut self, disable: bool) -> Self {
        self.disable_auto_retries = disable;
        self
    }

    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }

    /// Override the backoff schedule. Mostly useful to shrink delays in
    /// tests; the default matches production behavior.
    pub fn retry_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Assemble the client. No network traffic happens here; failures are
    /// confined to credential, key, and endpoint validation.
    pub fn build(self) -> Result<BmcClient> {
        let bundle = self.bundle.ok_or_else(|| {
            ProviderError::client_construction("No credentials supplied to the client builder")
        })?;

        let region = self
            .region
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let template = self
            .url_template
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        let endpoints = build_endpoints(&template, &region)?;

        let signer = RequestSigner::from_bundle(&bundle)?;

        let user_agent = format!("baremetal-provider-v{}", crate::VERSION);
        let http = self.transport.build_http_client(&user_agent)?;

        let retry_policy = if self.disable_auto_retries {
            RetryPolicy::disabled()
        } else {
            RetryPolicy::enabled()
        };

        tracing::debug!(
            region = %region,
            transport = ?self.transport,
            retries = retry_policy.enabled,
            "Session client configured"
        );

        Ok(BmcClient {
            http,
            signer,
            endpoints,
            region,
            transport: self.transport,
            retry_policy,
            schedule: self.schedule,
            user_agent,
        })
    }
}

/// The configured session client.
///
/// Holds the signing key, the validated per-service endpoints, and the
/// retry policy. All resource operations in a session go through one of
/// these; handlers receive it by reference and never build their own.
pub struct BmcClient {
    http: reqwest::Client,
    signer: RequestSigner,
    endpoints: HashMap<Service, Url>,
    region: String,
    transport: TransportConfig,
    retry_policy: RetryPolicy,
    schedule: RetrySchedule,
    user_agent: String,
}

impl fmt::Debug for BmcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BmcClient")
            .field("region", &self.region)
            .field("transport", &self.transport)
            .field("retries_enabled", &self.retry_policy.enabled)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl BmcClient {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn transport(&self) -> TransportConfig {
        self.transport
    }

    pub fn retries_enabled(&self) -> bool {
        self.retry_policy.enabled
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The `tenancy/user/fingerprint` identity requests are signed with.
    pub fn key_id(&self) -> &str {
        self.signer.key_id()
    }

    /// The validated base endpoint for a service.
    pub fn endpoint(&self, service: Service) -> &Url {
        &self.endpoints[&service]
    }

    /// Make a GET request to a service API
    pub async fn get(&self, service: Service, path: &str) -> Result<Value> {
        self.request_json(Method::GET, service, path, None).await
    }

    /// Make a GET request with query parameters (list filters etc.)
    pub async fn get_with_query(
        &self,
        service: Service,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value> {
        self.request_json(Method::GET, service, &with_query(path, params), None)
            .await
    }

    /// Make a POST request to a service API
    pub async fn post(&self, service: Service, path: &str, body: Option<&Value>) -> Result<Value> {
        self.request_json(Method::POST, service, path, body).await
    }

    /// Make a PUT request to a service API
    pub async fn put(&self, service: Service, path: &str, body: Option<&Value>) -> Result<Value> {
        self.request_json(Method::PUT, service, path, body).await
    }

    /// Make a DELETE request to a service API
    pub async fn delete(&self, service: Service, path: &str) -> Result<Value> {
        self.request_json(Method::DELETE, service, path, None).await
    }

    fn url_for(&self, service: Service, path: &str) -> Result<Url> {
        let base = self.endpoint(service).as_str();
        let joined = format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            service.api_version(),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            ProviderError::Terminal(ApiError::request(format!(
                "Request path {:?} does not form a valid URL: {}",
                path, e
            )))
        })
    }

    /// Sign, send, and decode one API call, retrying per the session policy.
    async fn request_json(
        &self,
        method: Method,
        service: Service,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url_for(service, path)?;
        let body_bytes = match body {
            Some(value) => Some(serde_json::to_vec(value).map_err(|e| {
                ProviderError::Terminal(ApiError::request(format!(
                    "Cannot serialize request body: {}",
                    e
                )))
            })?),
            None => None,
        };

        let operation = format!("{} {}", method, url);
        retry_transient(self.retry_policy, &self.schedule, &operation, || {
            self.send_once(&method, &url, body_bytes.as_deref())
        })
        .await
    }

    async fn send_once(&self, method: &Method, url: &Url, body: Option<&[u8]>) -> Result<Value> {
        let signed_headers = self.signer.sign(method, url, body)?;
        let outbound_request_id = uuid::Uuid::new_v4().simple().to_string();

        let mut request = self.http.request(method.clone(), url.clone());
        for (name, value) in &signed_headers {
            request = request.header(*name, value.as_str());
        }
        request = request.header("opc-request-id", outbound_request_id.as_str());
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        tracing::debug!("{} {}", method, url);

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transient(ApiError::transport(&e)))?;

        let status = response.status();
        // Prefer the id echoed by the service; fall back to the one we sent
        let request_id = response
            .headers()
            .get("opc-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or(Some(outbound_request_id));

        let body_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transient(ApiError::transport(&e)))?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body_text));
            let api = parse_error_body(status.as_u16(), &body_text, request_id);
            return Err(if api.is_transient() {
                ProviderError::Transient(api)
            } else {
                ProviderError::Terminal(api)
            });
        }

        // Handle empty response (deletes, accepted work requests)
        if body_text.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body_text).map_err(|e| {
            ProviderError::Terminal(ApiError {
                status: Some(status.as_u16()),
                code: None,
                message: format!("Failed to parse response JSON: {}", e),
                request_id,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_labels() {
        assert_eq!(Service::Core.host_label(), "iaas");
        assert_eq!(Service::LoadBalancer.host_label(), "iaas");
        assert_eq!(Service::Database.host_label(), "database");
        assert_eq!(Service::Identity.host_label(), "identity");
        assert_eq!(Service::ObjectStorage.host_label(), "objectstorage");
    }

    #[test]
    fn test_api_versions() {
        assert_eq!(Service::LoadBalancer.api_version(), "20170115");
        for service in [
            Service::Core,
            Service::Database,
            Service::Identity,
            Service::ObjectStorage,
        ] {
            assert_eq!(service.api_version(), "20160918");
        }
    }

    #[test]
    fn test_render_default_template() {
        assert_eq!(
            render_endpoint(DEFAULT_URL_TEMPLATE, Service::Core, "us-phoenix-1"),
            "https://iaas.us-phoenix-1.oraclecloud.com"
        );
        assert_eq!(
            render_endpoint(DEFAULT_URL_TEMPLATE, Service::ObjectStorage, "us-ashburn-1"),
            "https://objectstorage.us-ashburn-1.oraclecloud.com"
        );
    }

    #[test]
    fn test_template_without_placeholders_pins_all_services() {
        let endpoints = build_endpoints("http://127.0.0.1:4545", "us-phoenix-1").unwrap();
        assert_eq!(endpoints.len(), Service::ALL.len());
        for service in Service::ALL {
            assert_eq!(endpoints[&service].as_str(), "http://127.0.0.1:4545/");
        }
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let err = build_endpoints("not a url at all", "us-phoenix-1").unwrap_err();
        assert!(matches!(err, ProviderError::ClientConstruction { .. }));
        assert!(err.to_string().contains("url_template"));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = build_endpoints("ftp://{service}.{region}.oraclecloud.com", "us-phoenix-1")
            .unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn test_builder_requires_credentials() {
        let err = ClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, ProviderError::ClientConstruction { .. }));
    }
}
