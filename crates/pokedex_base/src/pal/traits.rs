use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::PokedexResult;

use super::file_path::FilePath;
use super::http::{HttpServerConfig, HttpServerHandle, HttpService};

/// Trait combining Read + Seek for file operations.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/* 📖 # Why is Pal a trait instead of a struct?

Using a trait enables two key benefits:
1. **Testability**: MockPal implements Pal for fast, deterministic tests without
   filesystem or network side effects
2. **Flexibility**: Code depends on the abstraction, not the concrete implementation
*/

/// Platform Abstraction Layer (PAL) trait providing filesystem and HTTP operations.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs` and serves HTTP via tiny_http
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a file exists at the given path.
    fn file_exists(&self, path: &FilePath) -> PokedexResult<bool>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> PokedexResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as bytes.
    fn read_file_to_bytes(&self, path: &FilePath) -> PokedexResult<Vec<u8>> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).map_err(|e| {
            Box::new(crate::PokedexError::new(crate::ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: e,
            }))
        })?;
        Ok(contents)
    }

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> PokedexResult<String> {
        let contents = self.read_file_to_bytes(path)?;
        String::from_utf8(contents).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }

    /// Create a new file, overwriting if it exists.
    fn create_file(&self, path: &FilePath) -> PokedexResult<Box<dyn Write>>;

    /// Replace the contents of a file with the given bytes.
    fn write_file(&self, path: &FilePath, contents: &[u8]) -> PokedexResult<()> {
        let mut writer = self.create_file(path)?;
        writer
            .write_all(contents)
            .and_then(|_| writer.flush())
            .map_err(|e| {
                Box::new(crate::PokedexError::new(crate::ErrorKind::FileError {
                    path: path.as_path().to_path_buf(),
                    source: e,
                }))
            })
    }

    /// Create a directory and all parent directories.
    fn create_directory_all(&self, path: &FilePath) -> PokedexResult<()>;

    /// Start an HTTP server with the given service.
    ///
    /// Returns a handle to the running server. The server starts immediately;
    /// when the last handle is dropped (or shutdown() is called) it stops
    /// accepting new connections.
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> PokedexResult<HttpServerHandle>;
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// Internally wraps `Arc<dyn Pal>` for cheap cloning and thread-safe sharing.
///
/// # Examples
///
/// ```no_run
/// use pokedex_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
