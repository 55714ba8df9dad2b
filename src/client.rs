//! oDesk REST API client implementation.
//!
//! The [`OdeskClient`] signs, sends and decodes requests against the oDesk
//! API. Resource paths are given without the format suffix; the client
//! appends `.json` itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use odesk::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OdeskClient::builder("public", "secret")
//!         .api_token("token")
//!         .build()?;
//!
//!     // Raw call
//!     let teams = client.get("api/hr/v2/teams", None)?;
//!     println!("{}", teams);
//!
//!     // Same call through the namespace
//!     let teams = client.hr()?.get("teams", Params::new().with("page", "0;10"))?;
//!     println!("{}", teams);
//!
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{AccessToken, AuthMode, AuthStrategy, Credentials, DelegatedAuth, SimpleAuth};
use crate::config::ClientConfig;
use crate::error::{OdeskError, OdeskResult};
use crate::http::{
    decode_as, decode_response, HttpMethod, HttpRequest, ReqwestTransport, ResponseFormat,
    Transport,
};
use crate::namespace::{Namespace, NamespaceClient, NamespaceDescriptor, Namespaces};
use crate::network::DEFAULT_USER_AGENT;
use crate::query::Params;

/// The last request a client built, as the caller asked for it.
///
/// `method` is the requested verb (`PUT`, `DELETE`, ...), `url` includes the
/// format suffix and `data` includes any `http_method` override, but no
/// authentication fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LastRequest {
    pub method: HttpMethod,
    pub url: String,
    pub data: Params,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for configuring [`OdeskClient`].
#[derive(Debug)]
pub struct OdeskClientBuilder {
    config: ClientConfig,
    format_name: Option<String>,
    default_headers: Vec<(String, String)>,
    user_agent: String,
    transport: Option<Box<dyn Transport>>,
    auth_strategy: Option<Box<dyn AuthStrategy>>,
}

impl OdeskClientBuilder {
    /// Create a new builder with the application's key pair.
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(public_key, secret_key))
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            format_name: None,
            default_headers: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport: None,
            auth_strategy: None,
        }
    }

    /// Set the API token sent with simple auth.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    pub fn auth(mut self, mode: AuthMode) -> Self {
        self.config.auth = mode;
        self
    }

    /// Set the access token pair used by delegated auth.
    pub fn access_token(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.access_token = Some(AccessToken::new(token, secret));
        self
    }

    /// Send delegated-auth parameters in an `Authorization` header.
    pub fn params_in_headers(mut self, enabled: bool) -> Self {
        self.config.params_in_headers = enabled;
        self
    }

    /// Set the response format by name. Only `json` is accepted; anything
    /// else fails at [`build`](Self::build).
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format_name = Some(format.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Choose which namespaces the client exposes.
    pub fn namespaces(mut self, namespaces: Namespaces) -> Self {
        self.config.namespaces = namespaces;
        self
    }

    /// Replace the HTTP transport. Timeout, user agent and default headers
    /// are then the transport's business.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Replace the authentication strategy picked from the configuration.
    pub fn auth_strategy(mut self, strategy: impl AuthStrategy + 'static) -> Self {
        self.auth_strategy = Some(Box::new(strategy));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// - [`OdeskError::Decode`] for an unsupported format name
    /// - [`OdeskError::Config`] for an invalid configuration (empty public
    ///   key, delegated auth without an access token, bad headers)
    pub fn build(self) -> OdeskResult<OdeskClient> {
        let mut config = self.config;
        if let Some(name) = &self.format_name {
            config.format = name.parse::<ResponseFormat>()?;
        }

        let credentials = Credentials {
            public_key: config.public_key.clone(),
            secret_key: config.secret_key.clone(),
            api_token: config.api_token.clone(),
        };

        config.validate_endpoint()?;

        let auth: Box<dyn AuthStrategy> = match self.auth_strategy {
            Some(strategy) => strategy,
            None => {
                config.validate()?;
                match (config.auth, config.access_token.clone()) {
                    (AuthMode::Simple, _) => Box::new(SimpleAuth::new(credentials.clone())),
                    (AuthMode::Delegated, Some(token)) => Box::new(DelegatedAuth::oauth1(
                        &credentials,
                        token,
                        config.params_in_headers,
                    )),
                    (AuthMode::Delegated, None) => {
                        return Err(OdeskError::Config(
                            "delegated auth requires an access token".to_string(),
                        ))
                    }
                }
            }
        };

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::from_config(
                config.timeout,
                &self.user_agent,
                &self.default_headers,
            )?),
        };

        let namespaces = config
            .namespaces
            .enabled()
            .map(|descriptor| (descriptor.namespace, descriptor))
            .collect();

        tracing::debug!(
            auth = %auth.mode(),
            base_url = %config.base_url,
            format = %config.format,
            "Built oDesk client"
        );

        Ok(OdeskClient {
            credentials,
            auth,
            transport,
            format: config.format,
            base_url: config.base_url,
            namespaces,
            last_request: Mutex::new(None),
        })
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// oDesk REST API client.
///
/// Every call goes through the same pipeline: resolve the URL, append the
/// format suffix, apply the verb override, authenticate, send, decode.
#[derive(Debug)]
pub struct OdeskClient {
    credentials: Credentials,
    auth: Box<dyn AuthStrategy>,
    transport: Box<dyn Transport>,
    format: ResponseFormat,
    base_url: String,
    namespaces: HashMap<Namespace, &'static NamespaceDescriptor>,
    last_request: Mutex<Option<LastRequest>>,
}

impl OdeskClient {
    /// Create a new client builder.
    pub fn builder(
        public_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> OdeskClientBuilder {
        OdeskClientBuilder::new(public_key, secret_key)
    }

    /// Build a client straight from a configuration.
    pub fn from_config(config: ClientConfig) -> OdeskResult<Self> {
        OdeskClientBuilder::from_config(config).build()
    }

    /// Build a client from `ODESK_*` environment variables.
    pub fn from_env() -> OdeskResult<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth.mode()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The last request built by this client, if any.
    pub fn last_request(&self) -> Option<LastRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    pub fn get(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.read(path, params.into().unwrap_or_default(), HttpMethod::Get)
    }

    pub fn post(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.read(path, params.into().unwrap_or_default(), HttpMethod::Post)
    }

    /// Sent as `POST` with `http_method=put`.
    pub fn put(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.read(path, params.into().unwrap_or_default(), HttpMethod::Put)
    }

    /// Sent as `POST` with `http_method=delete`.
    pub fn delete(&self, path: &str, params: impl Into<Option<Params>>) -> OdeskResult<Value> {
        self.read(path, params.into().unwrap_or_default(), HttpMethod::Delete)
    }

    pub fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: impl Into<Option<Params>>,
    ) -> OdeskResult<T> {
        Ok(decode_as(self.get(path, params)?)?)
    }

    pub fn post_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: impl Into<Option<Params>>,
    ) -> OdeskResult<T> {
        Ok(decode_as(self.post(path, params)?)?)
    }

    pub fn put_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: impl Into<Option<Params>>,
    ) -> OdeskResult<T> {
        Ok(decode_as(self.put(path, params)?)?)
    }

    pub fn delete_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: impl Into<Option<Params>>,
    ) -> OdeskResult<T> {
        Ok(decode_as(self.delete(path, params)?)?)
    }

    /// Full URL for `path`, including the format suffix.
    ///
    /// Absolute `http(s)` URLs are kept as they are; anything else is joined
    /// to the base URL.
    pub fn resource_url(&self, path: &str) -> String {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };

        let extension = self.format.extension();
        match url.split_once('?') {
            Some((base, query)) => format!("{}.{}?{}", base, extension, query),
            None => format!("{}.{}", url, extension),
        }
    }

    fn read(&self, path: &str, mut data: Params, method: HttpMethod) -> OdeskResult<Value> {
        let url = self.resource_url(path);
        let wire_method = method.apply_override(&mut data);

        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(LastRequest {
            method,
            url: url.clone(),
            data: data.clone(),
        });

        tracing::debug!(method = %method, wire = %wire_method, url = %url, "API request");

        let signed = self.auth.build(&url, wire_method, data)?;
        let request = HttpRequest::new(wire_method, url, signed);

        decode_response(self.transport.send(&request), self.format)
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    /// Sub-client for `namespace`.
    ///
    /// # Errors
    ///
    /// [`OdeskError::NamespaceDisabled`] when the namespace was switched off.
    pub fn namespace(&self, namespace: Namespace) -> OdeskResult<NamespaceClient<'_>> {
        self.namespaces
            .get(&namespace)
            .map(|descriptor| NamespaceClient::new(self, *descriptor))
            .ok_or(OdeskError::NamespaceDisabled(namespace))
    }

    /// Namespaces this client exposes.
    pub fn enabled_namespaces(&self) -> Vec<Namespace> {
        Namespace::ALL
            .into_iter()
            .filter(|ns| self.namespaces.contains_key(ns))
            .collect()
    }

    pub fn finance(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Finance)
    }

    pub fn finreport(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Finreport)
    }

    pub fn hr(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Hr)
    }

    pub fn mc(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Mc)
    }

    pub fn oconomy(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Oconomy)
    }

    pub fn nonauth_oconomy(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::NonauthOconomy)
    }

    pub fn provider(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Provider)
    }

    pub fn task(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Task)
    }

    pub fn team(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Team)
    }

    pub fn ticket(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Ticket)
    }

    pub fn timereport(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Timereport)
    }

    pub fn url(&self) -> OdeskResult<NamespaceClient<'_>> {
        self.namespace(Namespace::Url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, TransportError};
    use crate::http::RawResponse;

    #[derive(Debug)]
    struct Canned(&'static str);

    impl Transport for Canned {
        fn send(&self, _request: &HttpRequest) -> Result<RawResponse, TransportError> {
            Ok(RawResponse {
                status: 200,
                body: self.0.to_string(),
            })
        }
    }

    fn client() -> OdeskClient {
        OdeskClient::builder("public", "some$ecret")
            .transport(Canned(r#"{"ok": true}"#))
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_builder() {
        let client = OdeskClient::builder("public", "secret")
            .base_url("https://sandbox.odesk.com/")
            .timeout_secs(10)
            .header("X-Custom", "value")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://sandbox.odesk.com");
        assert_eq!(client.format(), ResponseFormat::Json);
        assert_eq!(client.auth_mode(), AuthMode::Simple);
        assert!(client.last_request().is_none());
    }

    #[test]
    fn test_unsupported_format_fails_build() {
        let err = OdeskClient::builder("public", "secret")
            .format("xml")
            .transport(Canned("{}"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            OdeskError::Decode(DecodeError::UnsupportedFormat(ref f)) if f == "xml"
        ));
    }

    #[test]
    fn test_delegated_requires_access_token() {
        let err = OdeskClient::builder("public", "secret")
            .auth(AuthMode::Delegated)
            .transport(Canned("{}"))
            .build()
            .unwrap_err();
        assert!(matches!(err, OdeskError::Config(_)));

        let client = OdeskClient::builder("public", "secret")
            .auth(AuthMode::Delegated)
            .access_token("at", "ats")
            .transport(Canned("{}"))
            .build()
            .unwrap();
        assert_eq!(client.auth_mode(), AuthMode::Delegated);
    }

    #[test]
    fn test_custom_auth_strategy_still_checks_endpoint() {
        let strategy = SimpleAuth::new(Credentials::new("public", "secret"));
        let err = OdeskClient::builder("public", "secret")
            .base_url("ftp://odesk.com")
            .auth_strategy(strategy.clone())
            .transport(Canned("{}"))
            .build()
            .unwrap_err();
        assert!(matches!(err, OdeskError::Config(_)));

        let err = OdeskClient::builder("", "secret")
            .auth_strategy(strategy.clone())
            .transport(Canned("{}"))
            .build()
            .unwrap_err();
        assert!(matches!(err, OdeskError::Config(_)));

        let client = OdeskClient::builder("public", "secret")
            .auth(AuthMode::Delegated)
            .auth_strategy(strategy)
            .transport(Canned("{}"))
            .build()
            .unwrap();
        assert_eq!(client.auth_mode(), AuthMode::Simple);
    }

    #[test]
    fn test_resource_url() {
        let client = client();
        assert_eq!(
            client.resource_url("api/hr/v2/teams"),
            "https://www.odesk.com/api/hr/v2/teams.json"
        );
        assert_eq!(
            client.resource_url("/api/hr/v2/teams"),
            "https://www.odesk.com/api/hr/v2/teams.json"
        );
        assert_eq!(
            client.resource_url("http://localhost:8080/x"),
            "http://localhost:8080/x.json"
        );
        assert_eq!(client.resource_url("https://h/x?a=1"), "https://h/x.json?a=1");
    }

    #[test]
    fn test_last_request_records_requested_verb() {
        let client = client();
        client
            .put("api/hr/v2/teams/t1", Params::new().with("name", "Ops"))
            .unwrap();

        let last = client.last_request().unwrap();
        assert_eq!(last.method, HttpMethod::Put);
        assert_eq!(last.url, "https://www.odesk.com/api/hr/v2/teams/t1.json");
        assert_eq!(
            last.data,
            Params::new().with("name", "Ops").with("http_method", "put")
        );
    }

    #[test]
    fn test_namespace_lookup() {
        let client = OdeskClient::builder("public", "secret")
            .namespaces(Namespaces::all().set(Namespace::Ticket, false))
            .transport(Canned("{}"))
            .build()
            .unwrap();

        assert!(client.hr().is_ok());
        assert!(matches!(
            client.ticket(),
            Err(OdeskError::NamespaceDisabled(Namespace::Ticket))
        ));
        assert!(!client.enabled_namespaces().contains(&Namespace::Ticket));
        assert_eq!(
            client.hr().unwrap().full_url("teams"),
            "https://www.odesk.com/api/hr/v2/teams"
        );
    }

    #[test]
    fn test_typed_response() {
        #[derive(serde::Deserialize)]
        struct Ack {
            ok: bool,
        }
        let ack: Ack = client().get_as("api/mc/v1/trays", None).unwrap();
        assert!(ack.ok);
    }
}
