/* 📖 # What lives in the api module?

Everything HTTP-facing in the engine. ApiService implements the HttpService
trait from pokedex_base, so it runs unchanged behind RealPal (tiny_http) and
MockPal (tests):
- service: routing, handlers and the error-to-status mapping
- assets: files under the configured asset directory at `/assets/...`
- docs: the welcome text, the `/api-docs` page and the OpenAPI document
*/

pub mod assets;
pub mod docs;
mod service;

pub use assets::AssetService;
pub use docs::ApiDocs;
pub use service::ApiService;
