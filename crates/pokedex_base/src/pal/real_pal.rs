use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument, warn};

use crate::{ErrorKind, PokedexError, PokedexResult, err};

use super::FilePath;
use super::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
    HttpStatusCode,
};
use super::traits::{Pal, ReadSeek};

/// How long a worker blocks in `recv_timeout` before re-checking the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/* 📖 # Why std::fs and tiny_http instead of an async stack?

Every request does one store call against in-process memory (or a small JSON
file), so there is nothing to gain from async I/O. tiny_http gives a blocking
accept loop that a fixed pool of worker threads can share; std::fs covers the
handful of file reads and writes. Both keep the call graph synchronous and easy
to follow.
*/

/// Concrete PAL implementation using the real filesystem and tiny_http.
///
/// All file paths are resolved relative to a configured base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }

    fn file_error(path: PathBuf, source: std::io::Error) -> Box<PokedexError> {
        Box::new(PokedexError::new(ErrorKind::FileError { path, source }))
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> PokedexResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.is_file();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> PokedexResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Self::file_error(resolved, e)
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath) -> PokedexResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating file");
        let file = fs::File::create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Self::file_error(resolved, e)
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FilePath) -> PokedexResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating directory and parents");
        fs::create_dir_all(&resolved).map_err(|e| Self::file_error(resolved, e))
    }

    #[instrument(skip(self, service), fields(address = %config.address()))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> PokedexResult<HttpServerHandle> {
        let address = config.address();
        let server = tiny_http::Server::http(&address)
            .map_err(|e| err!("Failed to bind HTTP server to {}: {}", address, e))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| err!("HTTP server on {} is not bound to an IP address", address))?;

        let handle = HttpServerHandle::new(port);
        let server = Arc::new(server);
        let service: Arc<dyn HttpService> = Arc::from(service);

        for worker in 0..config.worker_threads.max(1) {
            let server = Arc::clone(&server);
            let service = Arc::clone(&service);
            let shutdown = handle.shutdown_flag();
            let server_name = config.server_name.clone();
            std::thread::Builder::new()
                .name(format!("http-worker-{}", worker))
                .spawn(move || serve_requests(&server, service.as_ref(), &shutdown, &server_name))
                .map_err(|e| err!("Failed to spawn HTTP worker thread: {}", e))?;
        }

        info!(
            port,
            workers = config.worker_threads.max(1),
            "HTTP server listening"
        );
        Ok(handle)
    }
}

/// Worker loop: receive, dispatch, respond until the shutdown flag is set.
fn serve_requests(
    server: &tiny_http::Server,
    service: &dyn HttpService,
    shutdown: &AtomicBool,
    server_name: &str,
) {
    while !shutdown.load(Ordering::SeqCst) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => respond(request, service, server_name),
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "failed to receive HTTP request, worker exiting");
                return;
            }
        }
    }
    debug!("HTTP worker shut down");
}

fn respond(mut request: tiny_http::Request, service: &dyn HttpService, server_name: &str) {
    let started = Instant::now();
    let method = request.method().to_string();
    let url = request.url().to_string();

    let response = match read_request(&mut request) {
        Ok(http_request) => service.handle_request(http_request).unwrap_or_else(|e| {
            error!(method = %method, url = %url, error = ?e, "service failed to handle request");
            HttpResponse::error(HttpStatusCode::InternalServerError, "Internal server error")
                .with_cors_headers()
        }),
        Err(response) => response.with_cors_headers(),
    };

    let status = response.status().as_u16();
    if let Err(e) = request.respond(into_tiny_response(response, server_name)) {
        warn!(method = %method, url = %url, error = %e, "failed to send response");
    }
    info!(
        method = %method,
        url = %url,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
}

fn read_request(request: &mut tiny_http::Request) -> Result<HttpRequest, HttpResponse> {
    let method = HttpMethod::parse(&request.method().to_string()).ok_or_else(|| {
        HttpResponse::error(HttpStatusCode::MethodNotAllowed, "Method not allowed")
    })?;

    let mut body = Vec::new();
    request.as_reader().read_to_end(&mut body).map_err(|e| {
        HttpResponse::error(
            HttpStatusCode::BadRequest,
            &format!("Failed to read request body: {}", e),
        )
    })?;

    let mut http_request = HttpRequest::new(method, request.url()).with_body(body);
    for header in request.headers() {
        http_request = http_request.with_header(header.field.to_string(), header.value.to_string());
    }
    Ok(http_request)
}

fn into_tiny_response(
    response: HttpResponse,
    server_name: &str,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let status = tiny_http::StatusCode(response.status().as_u16());
    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let mut tiny = tiny_http::Response::from_data(response.into_body().into_bytes())
        .with_status_code(status);
    for (key, value) in headers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(std::iter::once(("Server", server_name)))
    {
        match tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            Ok(header) => tiny.add_header(header),
            Err(()) => warn!(header = key, "dropping response header with invalid bytes"),
        }
    }
    tiny
}
