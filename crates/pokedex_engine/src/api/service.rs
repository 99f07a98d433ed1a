/* 📖 # Why a single ApiService doing its own routing?

One service is registered with the PAL and receives every request. It splits
the path into segments and matches on (method, segments), which keeps the whole
route table in one `match` that reads top to bottom. Order matters there:
`GET /pokemons/20` (the paginated listing) and `GET /pokemons/search` come
before `GET /pokemons/:id`, so record 20 cannot be fetched by id with GET.

Handlers return `PokedexResult<HttpResponse>` and use `?` freely. The single
`error_response` function then decides the status from the ErrorKind, so no
handler builds error bodies itself.
*/

/* 📖 # Why are 500 bodies generic?

Client errors (400, 404, 409) carry the message of the error that caused them,
because the caller can act on it. Anything else is a fault on our side: the
full error with its context and span trace is logged, and the caller only
learns "Internal server error".
*/

use serde::Serialize;
use tracing::{debug, error, instrument};

use pokedex_base::pal::http::{
    HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode,
};
use pokedex_base::{ErrorKind, PalHandle, PokedexError, PokedexResult};

use crate::api::assets::AssetService;
use crate::api::docs::ApiDocs;
use crate::config::Config;
use crate::input::{CreatePokemon, UpdatePokemon};
use crate::page::{Page, PageRequest};
use crate::pokemon::PokemonId;
use crate::search::NameSearch;
use crate::store::StoreHandle;

/// Path segment of the paginated listing.
const PAGE_SEGMENT: &str = "20";

const POKEMON_NOT_FOUND: &str = "Pokemon not found";
const MISSING_NAME: &str = "Missing required query parameter 'name'";

/// Body of a successful delete.
#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: &'static str,
    id: PokemonId,
}

/// HTTP service exposing the collection, the assets and the docs.
#[derive(Debug, Clone)]
pub struct ApiService {
    store: StoreHandle,
    assets: AssetService,
    docs: ApiDocs,
}

impl ApiService {
    /// ```
    /// use pokedex_base::{FilePath, MockPal, PalHandle};
    /// use pokedex_engine::api::{ApiDocs, ApiService, AssetService};
    /// use pokedex_engine::store::{InMemoryStore, StoreHandle};
    ///
    /// let pal = PalHandle::new(MockPal::new());
    /// let service = ApiService::new(
    ///     StoreHandle::new(InMemoryStore::new()),
    ///     AssetService::new(pal, FilePath::from("assets")),
    ///     ApiDocs::new("http://localhost:3000"),
    /// );
    /// ```
    pub fn new(store: StoreHandle, assets: AssetService, docs: ApiDocs) -> Self {
        Self {
            store,
            assets,
            docs,
        }
    }

    /// Wire the service up from configuration.
    pub fn from_config(store: StoreHandle, pal: PalHandle, config: &Config) -> Self {
        Self::new(
            store,
            AssetService::new(pal, config.assets_dir()),
            ApiDocs::new(config.public_url()),
        )
    }

    fn route(&self, request: &HttpRequest) -> PokedexResult<HttpResponse> {
        let path = request.path().trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').skip(1).collect();

        let method = match request.method() {
            HttpMethod::Head => HttpMethod::Get,
            method => method,
        };

        match (method, segments.as_slice()) {
            (HttpMethod::Options, _) => Ok(HttpResponse::no_content()),
            (HttpMethod::Get, []) => Ok(HttpResponse::text(self.docs.welcome_text())),
            (HttpMethod::Get, ["api-docs"]) => Ok(HttpResponse::ok()
                .with_content_type("text/html; charset=utf-8")
                .with_body(self.docs.html_page())),
            (HttpMethod::Get, ["api-docs", "openapi.json"]) => {
                json_response(HttpStatusCode::Ok, &self.docs.openapi_document())
            }
            (HttpMethod::Get, ["pokemons"]) => self.list(),
            (HttpMethod::Post, ["pokemons"]) => self.create(request),
            (HttpMethod::Get, ["pokemons", PAGE_SEGMENT]) => self.list_page(request),
            (HttpMethod::Get, ["pokemons", "search"]) => self.search(request),
            (HttpMethod::Get, ["pokemons", id]) => self.get(id),
            (HttpMethod::Put, ["pokemons", id]) => self.update(id, request),
            (HttpMethod::Delete, ["pokemons", id]) => self.delete(id),
            (HttpMethod::Get, ["assets", rest @ ..]) => self.assets.serve(&rest.join("/")),
            (_, segments) if is_known_path(segments) => Ok(HttpResponse::error(
                HttpStatusCode::MethodNotAllowed,
                "Method not allowed",
            )),
            _ => Ok(HttpResponse::error(
                HttpStatusCode::NotFound,
                "Route not found",
            )),
        }
    }

    fn list(&self) -> PokedexResult<HttpResponse> {
        let pokemons = self.store.list()?;
        debug!(count = pokemons.len(), "listing all records");
        json_response(HttpStatusCode::Ok, &pokemons)
    }

    fn list_page(&self, request: &HttpRequest) -> PokedexResult<HttpResponse> {
        let page_request = PageRequest::from_query(request.query_param("page").as_deref());
        let data = self
            .store
            .list_page(page_request.skip(), page_request.limit())?;
        json_response(HttpStatusCode::Ok, &Page::new(page_request, data))
    }

    fn search(&self, request: &HttpRequest) -> PokedexResult<HttpResponse> {
        let query = request
            .query_param("name")
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Box::new(PokedexError::validation(MISSING_NAME)))?;
        let search = NameSearch::new(&query)?;
        let found = self.store.search(&search)?;
        debug!(query = %query, count = found.len(), "search finished");
        json_response(HttpStatusCode::Ok, &found)
    }

    fn get(&self, raw_id: &str) -> PokedexResult<HttpResponse> {
        let id = parse_id(raw_id)?;
        let pokemon = self.store.get(id)?.ok_or_else(pokemon_not_found)?;
        json_response(HttpStatusCode::Ok, &pokemon)
    }

    fn create(&self, request: &HttpRequest) -> PokedexResult<HttpResponse> {
        let input = CreatePokemon::from_json(request.body().as_bytes())?;
        let created = self.store.insert(input.into_pokemon())?;
        json_response(HttpStatusCode::Created, &created)
    }

    fn update(&self, raw_id: &str, request: &HttpRequest) -> PokedexResult<HttpResponse> {
        let id = parse_id(raw_id)?;
        let patch = UpdatePokemon::from_json(request.body().as_bytes())?;
        let updated = self.store.update(id, patch)?.ok_or_else(pokemon_not_found)?;
        json_response(HttpStatusCode::Ok, &updated)
    }

    fn delete(&self, raw_id: &str) -> PokedexResult<HttpResponse> {
        let id = parse_id(raw_id)?;
        self.store.remove(id)?.ok_or_else(pokemon_not_found)?;
        json_response(
            HttpStatusCode::Ok,
            &DeleteResponse {
                message: "Pokemon deleted successfully",
                id,
            },
        )
    }
}

impl HttpService for ApiService {
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    fn handle_request(&self, request: HttpRequest) -> PokedexResult<HttpResponse> {
        let response = self
            .route(&request)
            .unwrap_or_else(|e| error_response(&e))
            .with_cors_headers();
        // HEAD answers like GET, headers only
        if request.method() == HttpMethod::Head {
            return Ok(response.with_body(HttpBody::empty()));
        }
        Ok(response)
    }
}

/// Paths that exist for some method.
fn is_known_path(segments: &[&str]) -> bool {
    matches!(
        segments,
        [] | ["api-docs"]
            | ["api-docs", "openapi.json"]
            | ["pokemons"]
            | ["pokemons", _]
            | ["assets", ..]
    )
}

/// A non-numeric id matches no record.
fn parse_id(raw: &str) -> PokedexResult<PokemonId> {
    PokemonId::parse(raw).ok_or_else(pokemon_not_found)
}

fn pokemon_not_found() -> Box<PokedexError> {
    Box::new(PokedexError::not_found(POKEMON_NOT_FOUND))
}

/// Serialize data to JSON and wrap it in a response with the given status.
fn json_response<T: Serialize>(status: HttpStatusCode, data: &T) -> PokedexResult<HttpResponse> {
    serde_json::to_string(data)
        .map(|json| HttpResponse::json(status, json))
        .map_err(|e| {
            Box::new(PokedexError::message(format!(
                "JSON serialization error: {}",
                e
            )))
        })
}

fn error_response(error: &PokedexError) -> HttpResponse {
    let status = match error.kind() {
        ErrorKind::Validation { .. } => HttpStatusCode::BadRequest,
        ErrorKind::NotFound { .. } => HttpStatusCode::NotFound,
        ErrorKind::Conflict { .. } => HttpStatusCode::Conflict,
        _ => {
            error!(error = ?error, "request failed");
            return HttpResponse::error(
                HttpStatusCode::InternalServerError,
                "Internal server error",
            );
        }
    };
    debug!(status = status.as_u16(), error = %error, "client error");
    HttpResponse::error(status, &error.kind().to_string())
}
