/* 📖 # Why a dedicated HTTP module in the PAL?

The HTTP abstraction lets the API service be written against plain request and
response values, so the same service runs behind tiny_http in production and
behind MockPal::simulate_request in tests. Query-string parsing lives here too:
the service only ever asks for a decoded parameter by name.
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use serde_json::json;

/// HTTP methods supported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Parse an HTTP method from a string.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Convert the method to its string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP headers collection. Lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    inner: HashMap<String, String>,
}

impl HttpHeaders {
    /// Create empty headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any header with the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.inner.retain(|k, _| !k.eq_ignore_ascii_case(&key));
        self.inner.insert(key, value.into());
    }

    /// Get a header value.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Check if a header exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.inner.iter()
    }
}

/// HTTP message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpBody(Vec<u8>);

impl HttpBody {
    /// Create an empty body.
    pub fn empty() -> Self {
        Self(vec![])
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get content as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get content as a string if valid UTF-8.
    pub fn as_string(&self) -> Option<String> {
        String::from_utf8(self.0.clone()).ok()
    }

    /// Check if body is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the content length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Take ownership of the content.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for HttpBody {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<String> for HttpBody {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for HttpBody {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// HTTP request structure.
///
/// `url` is the raw request target, path plus optional query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    /// Get the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Get the raw request target including the query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the request path without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }

    /// Get the raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Look up a query parameter by name and percent-decode it.
    ///
    /// `+` decodes to a space. The first occurrence wins; a parameter given
    /// without `=` yields an empty string.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if decode_query_component(key) == name {
                Some(decode_query_component(value))
            } else {
                None
            }
        })
    }

    /// Get the request headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Get the request body.
    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }
}

fn decode_query_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// HTTP status codes used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusCode {
    Ok = 200,
    Created = 201,
    NoContent = 204,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    Conflict = 409,
    InternalServerError = 500,
}

impl HttpStatusCode {
    /// Get the numeric status code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// HTTP response structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: HttpStatusCode,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpResponse {
    /// Create a new response with the given status.
    pub fn new(status: HttpStatusCode) -> Self {
        Self {
            status,
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    /// Create a 200 OK response.
    pub fn ok() -> Self {
        Self::new(HttpStatusCode::Ok)
    }

    /// Create a 204 No Content response.
    pub fn no_content() -> Self {
        Self::new(HttpStatusCode::NoContent)
    }

    /// Get the status code.
    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Get the body.
    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Take ownership of the body.
    pub fn into_body(self) -> HttpBody {
        self.body
    }

    /// Set the response body.
    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set the Content-Type header.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Create a JSON response with the given status.
    pub fn json(status: HttpStatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_content_type("application/json")
            .with_body(body.into())
    }

    /// Create a plain text 200 response.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .with_content_type("text/plain; charset=utf-8")
            .with_body(body.into())
    }

    /// Create a `{"error": message}` JSON response.
    pub fn error(status: HttpStatusCode, message: &str) -> Self {
        Self::json(status, json!({ "error": message }).to_string())
    }

    /// Add the CORS headers every response carries.
    pub fn with_cors_headers(self) -> Self {
        self.with_header("Access-Control-Allow-Origin", "*")
            .with_header(
                "Access-Control-Allow-Methods",
                "GET, HEAD, POST, PUT, DELETE, OPTIONS",
            )
            .with_header("Access-Control-Allow-Headers", "Content-Type")
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on. If None, the OS will assign an available port.
    pub port: Option<u16>,
    /// Server name used in responses.
    pub server_name: String,
    /// Number of threads handling requests concurrently.
    pub worker_threads: usize,
}

impl HttpServerConfig {
    /// Create a new configuration with the given host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Set the number of worker threads (at least one).
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }

    /// Get the address string (host:port, port 0 for OS-assigned).
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(0))
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
            server_name: "pokedex".to_string(),
            worker_threads: 4,
        }
    }
}

/* 📖 # Why a single HttpService trait?

The service receives raw HttpRequest values and returns HttpResponse values,
and does its own routing. There is no route registration API to learn, and a
test can drive the whole API by calling handle_request directly.
*/

/// Trait for handling HTTP requests.
pub trait HttpService: std::fmt::Debug + Send + Sync + 'static {
    /// Handle an HTTP request and return a response.
    ///
    /// Errors returned here are not expected to carry client-facing detail:
    /// the PAL implementation logs them and answers with a generic 500.
    fn handle_request(&self, request: HttpRequest) -> crate::PokedexResult<HttpResponse>;
}

/// Sets the shutdown flag once the last handle clone is gone.
#[derive(Debug)]
struct ShutdownOnDrop(Arc<AtomicBool>);

impl Drop for ShutdownOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Handle to a running HTTP server.
///
/// Clones share one shutdown guard. When the last clone is dropped, the
/// server shuts down (stops accepting new connections).
#[derive(Debug, Clone)]
pub struct HttpServerHandle {
    port: u16,
    guard: Arc<ShutdownOnDrop>,
}

impl HttpServerHandle {
    /// Create a new handle for the given port.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            guard: Arc::new(ShutdownOnDrop(Arc::new(AtomicBool::new(false)))),
        }
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the full address (host:port) the server is listening on.
    pub fn address(&self, host: &str) -> String {
        format!("{}:{}", host, self.port)
    }

    /// Signal the server to shut down.
    pub fn shutdown(&self) {
        self.guard.0.store(true, Ordering::SeqCst);
    }

    /// Check if the server has been signaled to shut down.
    pub fn is_shutdown(&self) -> bool {
        self.guard.0.load(Ordering::SeqCst)
    }

    /// Block the calling thread until shutdown is signaled.
    pub fn wait(&self) {
        while !self.is_shutdown() {
            std::thread::sleep(Duration::from_millis(250));
        }
    }

    /// The flag worker threads poll; holding it does not keep the server alive.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.guard.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("put"), Some(HttpMethod::Put)); // Case insensitive
        assert_eq!(HttpMethod::parse("options"), Some(HttpMethod::Options));
        assert_eq!(HttpMethod::parse("BREW"), None);
    }

    #[test]
    fn test_http_headers_case_insensitive() {
        let mut headers = HttpHeaders::new();
        headers.insert("Content-Type", "application/json");
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );

        headers.insert("content-type", "text/plain");
        assert_eq!(headers.iter().count(), 1);
        assert_eq!(headers.get("Content-Type"), Some(&"text/plain".to_string()));
    }

    #[test]
    fn test_request_path_and_query() {
        let request = HttpRequest::new(HttpMethod::Get, "/pokemons/20?page=3");
        assert_eq!(request.path(), "/pokemons/20");
        assert_eq!(request.query(), Some("page=3"));
        assert_eq!(request.query_param("page"), Some("3".to_string()));
        assert_eq!(request.query_param("limit"), None);

        let bare = HttpRequest::new(HttpMethod::Get, "/pokemons");
        assert_eq!(bare.path(), "/pokemons");
        assert_eq!(bare.query(), None);
        assert_eq!(bare.query_param("page"), None);
    }

    #[test]
    fn test_query_param_decoding() {
        let request = HttpRequest::new(
            HttpMethod::Get,
            "/pokemons/search?lang=fr&name=Mr.+Mime&other=%C3%A9",
        );
        assert_eq!(request.query_param("name"), Some("Mr. Mime".to_string()));
        assert_eq!(request.query_param("other"), Some("é".to_string()));

        let flag = HttpRequest::new(HttpMethod::Get, "/pokemons/search?name");
        assert_eq!(flag.query_param("name"), Some(String::new()));
    }

    #[test]
    fn test_http_response_helpers() {
        let json = HttpResponse::json(HttpStatusCode::Created, "{\"id\":1}");
        assert_eq!(json.status(), HttpStatusCode::Created);
        assert_eq!(
            json.headers().get("Content-Type"),
            Some(&"application/json".to_string())
        );

        let text = HttpResponse::text("Hello");
        assert_eq!(text.body().as_string(), Some("Hello".to_string()));
        assert_eq!(HttpResponse::no_content().status().as_u16(), 204);
    }

    #[test]
    fn test_error_response_escapes_message() {
        let response = HttpResponse::error(HttpStatusCode::BadRequest, "bad \"name\"\n");
        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(
            response.body().as_string().unwrap(),
            r#"{"error":"bad \"name\"\n"}"#
        );
    }

    #[test]
    fn test_error_response_escapes_control_characters() {
        let message = "ctl\u{1}\u{7f}\u{2028}\"\\";
        let response = HttpResponse::error(HttpStatusCode::BadRequest, message);
        let body: serde_json::Value =
            serde_json::from_slice(response.body().as_bytes()).unwrap();
        assert_eq!(body, json!({ "error": message }));
    }

    #[test]
    fn test_cors_headers() {
        let response = HttpResponse::ok().with_cors_headers();
        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&"*".to_string())
        );
        assert!(response.headers().contains("Access-Control-Allow-Methods"));
    }

    #[test]
    fn test_http_server_config() {
        let config = HttpServerConfig::new("0.0.0.0")
            .with_port(3000)
            .with_server_name("test-server")
            .with_worker_threads(0);

        assert_eq!(config.address(), "0.0.0.0:3000");
        assert_eq!(config.server_name, "test-server");
        assert_eq!(config.worker_threads, 1);
        assert_eq!(HttpServerConfig::default().address(), "127.0.0.1:0");
    }

    #[test]
    fn test_http_server_handle_shutdown_on_last_drop() {
        let handle = HttpServerHandle::new(3000);
        let flag = handle.shutdown_flag();
        let clone = handle.clone();

        drop(clone);
        assert!(!flag.load(Ordering::SeqCst));

        drop(handle);
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_http_server_handle_explicit_shutdown() {
        let handle = HttpServerHandle::new(3000);
        assert_eq!(handle.address("127.0.0.1"), "127.0.0.1:3000");
        assert!(!handle.is_shutdown());
        handle.shutdown();
        assert!(handle.is_shutdown());
        handle.wait();
    }
}
