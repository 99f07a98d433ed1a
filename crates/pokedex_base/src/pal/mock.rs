use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::ErrorKind;
use crate::{PokedexError, PokedexResult, err};

use super::FilePath;
use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why keep MockPal state behind shared mutexes?

Tests hand a clone of the MockPal to the code under test (usually wrapped in a
PalHandle) and keep another clone to seed files or inspect what was written.
All clones share the same maps, so a write made by the store is visible to the
test immediately. Requests go straight to the registered service with no
socket in between, which keeps API tests fast and deterministic.
*/

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use pokedex_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("pokedex.toml"), b"port = 8080".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("pokedex.toml")).unwrap();
/// assert_eq!(content, "port = 8080");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    directories: Arc<Mutex<HashSet<FilePath>>>,
    http_servers: Arc<Mutex<HashMap<u16, Arc<dyn HttpService>>>>,
    next_port: Arc<AtomicU16>,
    read_only: Arc<AtomicBool>,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashSet::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
            read_only: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: impl Into<FilePath>, content: impl Into<Vec<u8>>) {
        self.files.lock().insert(path.into(), content.into());
    }

    /// Current contents of a file, if present.
    pub fn file_contents(&self, path: impl Into<FilePath>) -> Option<Vec<u8>> {
        self.files.lock().get(&path.into()).cloned()
    }

    /// Whether a directory was created or added.
    pub fn has_directory(&self, path: impl Into<FilePath>) -> bool {
        self.directories.lock().contains(&path.into())
    }

    /// Make every subsequent `create_file` fail with a permission error.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Dispatch a request to the service registered on `port`.
    ///
    /// Service errors are returned as-is rather than being turned into a 500,
    /// so tests can assert on them.
    pub fn simulate_request(&self, port: u16, request: HttpRequest) -> PokedexResult<HttpResponse> {
        let service = self
            .http_servers
            .lock()
            .get(&port)
            .cloned()
            .ok_or_else(|| err!("No HTTP server registered on port {}", port))?;
        debug!(port, method = %request.method(), url = request.url(), "simulating request");
        service.handle_request(request)
    }

    /// Get the number of registered HTTP servers.
    pub fn http_server_count(&self) -> usize {
        self.http_servers.lock().len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> PokedexResult<bool> {
        Ok(self.files.lock().contains_key(path))
    }

    fn read_file(&self, path: &FilePath) -> PokedexResult<Box<dyn ReadSeek + 'static>> {
        let content = self.files.lock().get(path).cloned().ok_or_else(|| {
            Box::new(PokedexError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ),
            }))
        })?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_file(&self, path: &FilePath) -> PokedexResult<Box<dyn Write>> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(Box::new(PokedexError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock filesystem is read-only",
                ),
            })));
        }
        // Contents land in the shared map when the writer is dropped
        Ok(Box::new(MockFileWriter {
            path: path.clone(),
            files: Arc::clone(&self.files),
            buffer: Vec::new(),
        }))
    }

    fn create_directory_all(&self, path: &FilePath) -> PokedexResult<()> {
        self.directories.lock().insert(path.clone());
        Ok(())
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> PokedexResult<HttpServerHandle> {
        let port = match config.port {
            Some(port) => port,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };
        let mut servers = self.http_servers.lock();
        if servers.contains_key(&port) {
            return Err(err!("Port {} is already in use", port));
        }
        servers.insert(port, Arc::from(service));
        Ok(HttpServerHandle::new(port))
    }
}

/// Buffers writes and commits them to the MockPal on drop.
struct MockFileWriter {
    path: FilePath,
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.files
            .lock()
            .insert(self.path.clone(), std::mem::take(&mut self.buffer));
    }
}
