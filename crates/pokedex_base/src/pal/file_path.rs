use relative_path::{RelativePath, RelativePathBuf};
use std::path::{Component, Path};

/* 📖 # Why use RelativePathBuf for FilePath?

FilePath wraps RelativePathBuf so every path handed to the PAL is relative to
its base directory (the service's working directory). Asset requests build
FilePaths from URL segments, so FilePath also knows whether a path stays
inside the base directory.
*/

/// Type-safe wrapper for file paths relative to PAL base directory.
///
/// # Examples
///
/// ```
/// use pokedex_base::FilePath;
///
/// let path = FilePath::from("assets/pokemons/025.png");
/// assert!(path.is_contained());
/// assert!(!FilePath::from("../secret.txt").is_contained());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// Returns the underlying RelativePathBuf as a reference.
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// Converts to a regular Path for use with std::fs operations.
    /// This returns the relative path portion without a base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_relative().as_str())
    }

    /// Append a path component or relative path.
    pub fn join(&self, other: impl AsRef<str>) -> FilePath {
        Self(self.0.join(other.as_ref()))
    }

    /// True when the path has no `..`, root or prefix components, i.e. it
    /// cannot leave the PAL base directory.
    pub fn is_contained(&self) -> bool {
        self.as_path()
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    }

    /// The containing directory, or None for a path directly in the base directory.
    pub fn parent(&self) -> Option<FilePath> {
        self.0
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map(|parent| Self(parent.to_relative_path_buf()))
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.0.extension().map(|ext| ext.to_ascii_lowercase())
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl From<&Path> for FilePath {
    fn from(p: &Path) -> Self {
        Self(RelativePathBuf::from(p.to_string_lossy().into_owned()))
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}
