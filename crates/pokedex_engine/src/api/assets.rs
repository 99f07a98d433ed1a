use tracing::{debug, info};

use pokedex_base::pal::http::{HttpBody, HttpResponse};
use pokedex_base::{FilePath, PalHandle, PokedexError, PokedexResult};

/* 📖 # Why serve assets through the PAL?

Record images live in a directory next to the data file and are served under
`/assets`. Reading them through the PAL keeps the API service free of direct
filesystem access, and lets tests seed images into MockPal. Request paths are
checked segment by segment before they are joined onto the asset directory,
so `..` or an absolute path can never reach outside it.
*/

/// Serves files below a directory at `/assets/<path>`.
#[derive(Debug, Clone)]
pub struct AssetService {
    pal: PalHandle,
    root: FilePath,
}

impl AssetService {
    pub fn new(pal: PalHandle, root: FilePath) -> Self {
        Self { pal, root }
    }

    /// Serve `relative` (the part of the URL after `/assets/`).
    ///
    /// Unsafe or missing paths are `ErrorKind::NotFound`.
    pub fn serve(&self, relative: &str) -> PokedexResult<HttpResponse> {
        let path = self.resolve(relative).ok_or_else(asset_not_found)?;
        if !self.pal.file_exists(&path)? {
            debug!(path = %path, "asset does not exist");
            return Err(asset_not_found());
        }
        let content = self.pal.read_file_to_bytes(&path)?;
        let content_type = guess_content_type(&path);
        info!(
            path = %path,
            content_type,
            content_size = content.len(),
            "serving asset"
        );
        Ok(HttpResponse::ok()
            .with_content_type(content_type)
            .with_body(HttpBody::from_bytes(content)))
    }

    fn resolve(&self, relative: &str) -> Option<FilePath> {
        let safe = !relative.is_empty()
            && relative
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if !safe {
            return None;
        }
        let path = self.root.join(relative);
        path.is_contained().then_some(path)
    }
}

fn asset_not_found() -> Box<PokedexError> {
    Box::new(PokedexError::not_found("Asset not found"))
}

/// Guess the MIME type based on file extension.
fn guess_content_type(path: &FilePath) -> &'static str {
    match path.extension().as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_base::{ErrorKind, MockPal};

    fn create_test_service() -> AssetService {
        let mock = MockPal::new();
        mock.add_file("assets/pokemons/025.png", vec![0x89, b'P', b'N', b'G']);
        mock.add_file("assets/readme.txt", b"images".to_vec());
        mock.add_file("pokedex.json", b"[]".to_vec());
        AssetService::new(PalHandle::new(mock), FilePath::from("assets"))
    }

    fn assert_not_found(result: PokedexResult<HttpResponse>) {
        let err = result.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotFound { .. }));
        assert_eq!(err.to_string(), "Asset not found");
    }

    #[test]
    fn test_serve_image() {
        let response = create_test_service().serve("pokemons/025.png").unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"image/png".to_string())
        );
        assert_eq!(response.body().as_bytes(), [0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_serve_text() {
        let response = create_test_service().serve("readme.txt").unwrap();
        assert_eq!(
            response.headers().get("Content-Type"),
            Some(&"text/plain".to_string())
        );
    }

    #[test]
    fn test_missing_asset() {
        assert_not_found(create_test_service().serve("pokemons/999.png"));
        assert_not_found(create_test_service().serve(""));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let service = create_test_service();
        assert_not_found(service.serve("../pokedex.json"));
        assert_not_found(service.serve("pokemons/../../pokedex.json"));
        assert_not_found(service.serve("pokemons//025.png"));
        assert_not_found(service.serve("./pokemons/025.png"));
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(&FilePath::from("a/B.PNG")), "image/png");
        assert_eq!(guess_content_type(&FilePath::from("a.jpeg")), "image/jpeg");
        assert_eq!(
            guess_content_type(&FilePath::from("noext")),
            "application/octet-stream"
        );
    }
}
